//! Configuration validation.
//!
//! # Responsibilities
//! - Shape checks for dynamic input (records are objects, `depends` is a
//!   name or a list of names)
//! - Referential integrity (every dependency names a declared service)
//! - Behavior coverage (every service has a behavior, every behavior a service)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function of config and behaviors
//! - Runs before any graph or lifecycle state is built

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::lifecycle::behavior::Behaviors;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("service configuration must be an object keyed by service name")]
    NotAnObject,

    #[error("service `{service}`: configuration entry is not a record")]
    NotARecord { service: String },

    #[error("service `{service}`: `depends` must be a service name or a list of names")]
    InvalidDepends { service: String },

    #[error("service `{service}` depends on unknown service `{dependency}`")]
    UnknownDependency { service: String, dependency: String },

    #[error("service `{service}` lists dependency `{dependency}` more than once")]
    DuplicateDependency { service: String, dependency: String },

    #[error("service `{service}` has no registered behavior")]
    MissingBehavior { service: String },

    #[error("behavior registered for undeclared service `{service}`")]
    OrphanBehavior { service: String },
}

/// Every validation failure found in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.0
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: ")?;
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a configuration against a behavior registry.
pub fn validate_system<V>(
    config: &ServiceConfig,
    behaviors: &Behaviors<V>,
) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    for (name, record) in config.iter() {
        let mut seen = HashSet::new();
        for dependency in record.dependencies() {
            if !config.contains(dependency) {
                errors.push(ValidationError::UnknownDependency {
                    service: name.to_string(),
                    dependency: dependency.clone(),
                });
            }
            if !seen.insert(dependency.as_str()) {
                errors.push(ValidationError::DuplicateDependency {
                    service: name.to_string(),
                    dependency: dependency.clone(),
                });
            }
        }

        if !behaviors.contains(name) {
            errors.push(ValidationError::MissingBehavior {
                service: name.to_string(),
            });
        }
    }

    // Registry iteration order is unspecified; sort for stable reports.
    let mut orphans: Vec<&str> = behaviors.names().filter(|n| !config.contains(n)).collect();
    orphans.sort_unstable();
    errors.extend(orphans.into_iter().map(|service| ValidationError::OrphanBehavior {
        service: service.to_string(),
    }));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
