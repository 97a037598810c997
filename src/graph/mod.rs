//! Dependency graph subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceConfig
//!     → edges_of (dependency → dependent)
//!     → DependencyGraph::build (names resolved to positions)
//!     → DependencyGraph::sorted (Kahn, declaration-order tie-break)
//!     → start order, cached by the System
//! ```

pub mod resolver;

pub use resolver::{dependencies_of, edges_of, sorted_order, DependencyGraph, GraphError};
