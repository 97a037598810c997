//! Declarative service wiring with ordered start/stop.
//!
//! # Architecture Overview
//!
//! ```text
//!   ServiceConfig ──▶ graph (edges, topological order)
//!         │                        │
//!         ▼                        ▼
//!   Behaviors ──────────▶ lifecycle::System ──▶ values (running / stopped)
//! ```
//!
//! Services are declared in a [`ServiceConfig`] (data only, optionally
//! loaded from TOML or JSON) and given start/stop callbacks in a
//! [`Behaviors`] registry. A [`System`] resolves the dependency graph once
//! and then starts services dependency-first, handing each start callback
//! the values of its direct dependencies.
//!
//! ```
//! use service_system::{
//!     Behavior, Behaviors, BoxError, ServiceConfig, ServiceRecord, StartContext, System,
//! };
//!
//! fn val(ctx: &StartContext<'_, i64>) -> Result<i64, BoxError> {
//!     Ok(ctx.record().get("val").and_then(|v| v.as_i64()).unwrap_or(0))
//! }
//!
//! let config = ServiceConfig::new()
//!     .service("x", ServiceRecord::new().field("val", 1))
//!     .service("y", ServiceRecord::new().field("val", 2).depends_on("x"))
//!     .service("sum", ServiceRecord::new().depends_on_all(["x", "y"]));
//!
//! let behaviors = Behaviors::new()
//!     .with("x", Behavior::new(val))
//!     .with("y", Behavior::new(val))
//!     .with("sum", Behavior::new(|ctx| Ok(ctx.deps().iter().filter_map(|(_, v)| v).sum::<i64>())));
//!
//! let mut system = System::new(config, behaviors).unwrap();
//! system.start("sum").unwrap();
//! assert_eq!(system.get("sum"), Some(&3));
//! assert_eq!(system.to_string(), "System{x, y, sum}");
//! ```

pub mod config;
pub mod graph;
pub mod lifecycle;
pub mod observability;

pub use config::{ServiceConfig, ServiceRecord, SystemOptions};
pub use graph::GraphError;
pub use lifecycle::{
    Behavior, Behaviors, BoxError, Dependencies, LifecycleError, StartContext, System, SystemError,
};
