//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config loading, construction, start/stop transitions
//!     → tracing events with a `service` field
//!     → logging.rs (subscriber installed by the host application)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is opt-in
//! - Transitions log at info, skips at trace, callback failures at error

pub mod logging;

pub use logging::init_logging;
