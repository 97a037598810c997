//! Lifecycle error types.

use thiserror::Error;

use crate::config::ValidationErrors;
use crate::graph::GraphError;
use crate::lifecycle::behavior::BoxError;

/// Errors that prevent a [`System`](crate::lifecycle::System) from being built.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors raised by start and stop operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("unknown service `{0}`")]
    UnknownService(String),

    #[error("service `{0}` has no registered behavior")]
    MissingBehavior(String),

    /// Error returned by a start or stop callback, passed through as is.
    #[error(transparent)]
    Callback(BoxError),
}

impl LifecycleError {
    /// The callback's own error, if this came from a callback.
    pub fn into_callback_error(self) -> Option<BoxError> {
        match self {
            LifecycleError::Callback(e) => Some(e),
            _ => None,
        }
    }
}
