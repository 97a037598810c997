//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Construction (system.rs):
//!     Validate (optional) → Build graph → Sort → All values stopped
//!
//! start(name):
//!     Start direct dependencies (recursively) → start callback(ctx) → store value
//!
//! stop(name):
//!     stop callback(value, deps) → clear value
//!
//! start_all / stop_all:
//!     Cached order ascending / descending
//! ```
//!
//! # Design Decisions
//! - Ordered startup: dependencies before dependents
//! - Ordered shutdown: dependents before dependencies
//! - Callback errors are returned unchanged; nothing is rolled back

pub mod behavior;
pub mod error;
pub mod system;

pub use behavior::{Behavior, Behaviors, BoxError, Dependencies, StartContext};
pub use error::{LifecycleError, SystemError};
pub use system::System;
