//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/JSON) or serde_json::Value
//!     → loader.rs (parse, preserving document order)
//!     → schema.rs (shape checks → ServiceConfig)
//!     → validation.rs (referential checks, optional)
//!     → ServiceConfig (immutable once owned by a System)
//! ```
//!
//! # Design Decisions
//! - Declaration order is kept; it is the tie-break for start order
//! - Records hold data only; behavior is registered separately
//! - Shape errors are always reported, referential checks on request

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{Depends, ServiceConfig, ServiceRecord, SystemOptions};
pub use validation::{validate_system, ValidationError, ValidationErrors};
