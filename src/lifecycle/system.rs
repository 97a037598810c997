//! The service system aggregate.
//!
//! # Responsibilities
//! - Own configuration, behaviors, cached start order and current values
//! - Start services dependency-first, injecting dependency values
//! - Stop services individually or in reverse start order
//!
//! # Design Decisions
//! - Start is idempotent: a running service is never restarted
//! - Stop never cascades to dependents or dependencies
//! - No rollback: a failed start leaves its dependencies running
//! - The cached start order is read-only after construction
//! - Dependency walks use a heap-allocated stack, not recursion

use std::fmt;

use serde::{Serialize, Serializer};

use crate::config::{validate_system, ServiceConfig, SystemOptions};
use crate::graph::DependencyGraph;
use crate::lifecycle::behavior::{Behaviors, Dependencies, StartContext};
use crate::lifecycle::error::{LifecycleError, SystemError};

/// A set of interdependent services and their current values.
///
/// A value of `None` means the service is stopped.
pub struct System<V> {
    config: ServiceConfig,
    graph: DependencyGraph,
    order: Vec<usize>,
    values: Vec<Option<V>>,
    behaviors: Behaviors<V>,
}

impl<V> System<V> {
    /// Build a system without validation.
    pub fn new(config: ServiceConfig, behaviors: Behaviors<V>) -> Result<Self, SystemError> {
        Self::with_options(config, behaviors, SystemOptions::default())
    }

    /// Build a system after validating configuration and behaviors.
    pub fn validated(config: ServiceConfig, behaviors: Behaviors<V>) -> Result<Self, SystemError> {
        Self::with_options(config, behaviors, SystemOptions { validate: true })
    }

    pub fn with_options(
        config: ServiceConfig,
        behaviors: Behaviors<V>,
        options: SystemOptions,
    ) -> Result<Self, SystemError> {
        if options.validate {
            if let Err(errors) = validate_system(&config, &behaviors) {
                tracing::warn!(errors = errors.errors().len(), "Service system rejected: {}", errors);
                return Err(errors.into());
            }
        }

        let graph = DependencyGraph::build(&config)?;
        let order = graph.sorted()?;
        let values = std::iter::repeat_with(|| None).take(config.len()).collect();

        tracing::info!(
            services = config.len(),
            validated = options.validate,
            "Service system constructed"
        );

        Ok(Self {
            config,
            graph,
            order,
            values,
            behaviors,
        })
    }

    /// Current value of the named service; `None` if stopped or unknown.
    pub fn get(&self, name: &str) -> Option<&V> {
        self.config
            .position(name)
            .and_then(|i| self.values[i].as_ref())
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.config.contains(name)
    }

    /// Names of running services, in declaration order.
    pub fn running(&self) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, value)| value.is_some())
            .map(|(i, _)| self.config.name_at(i))
    }

    /// Service names in start order.
    pub fn order(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|&i| self.config.name_at(i))
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn behaviors(&self) -> &Behaviors<V> {
        &self.behaviors
    }

    /// Start `name` after its dependencies.
    ///
    /// Already running services, including `name` itself, are left alone.
    pub fn start(&mut self, name: &str) -> Result<&mut Self, LifecycleError> {
        let index = self.position(name)?;
        self.start_at(index)?;
        Ok(self)
    }

    /// Start every service in start order.
    pub fn start_all(&mut self) -> Result<&mut Self, LifecycleError> {
        for pos in 0..self.order.len() {
            let index = self.order[pos];
            self.start_at(index)?;
        }
        Ok(self)
    }

    /// Stop `name` only. Dependents keep whatever value they hold.
    pub fn stop(&mut self, name: &str) -> Result<&mut Self, LifecycleError> {
        let index = self.position(name)?;
        self.stop_at(index)?;
        Ok(self)
    }

    /// Stop every service in reverse start order.
    pub fn stop_all(&mut self) -> Result<&mut Self, LifecycleError> {
        for pos in (0..self.order.len()).rev() {
            let index = self.order[pos];
            self.stop_at(index)?;
        }
        Ok(self)
    }

    /// Pretty JSON of the configuration.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.config)
    }

    fn position(&self, name: &str) -> Result<usize, LifecycleError> {
        self.config
            .position(name)
            .ok_or_else(|| LifecycleError::UnknownService(name.to_string()))
    }

    /// Depth-first walk over dependencies with an explicit stack of
    /// `(service, next dependency position)` frames.
    fn start_at(&mut self, index: usize) -> Result<(), LifecycleError> {
        let mut stack = vec![(index, 0)];
        while let Some((current, next)) = stack.pop() {
            if self.values[current].is_some() {
                tracing::trace!(service = %self.config.name_at(current), "Already running");
                continue;
            }
            if let Some(&dependency) = self.graph.dependencies(current).get(next) {
                stack.push((current, next + 1));
                stack.push((dependency, 0));
                continue;
            }
            self.launch(current)?;
        }
        Ok(())
    }

    /// Run the start callback of a service whose dependencies are running.
    fn launch(&mut self, index: usize) -> Result<(), LifecycleError> {
        let name = self.config.name_at(index);
        let behavior = self
            .behaviors
            .get(name)
            .ok_or_else(|| LifecycleError::MissingBehavior(name.to_string()))?;

        tracing::debug!(service = %name, "Starting service");
        let value = {
            let ctx = StartContext {
                name,
                record: self.config.record_at(index),
                config: &self.config,
                deps: dependency_view(&self.config, self.graph.dependencies(index), &self.values),
            };
            behavior.start(&ctx).map_err(|e| {
                tracing::error!(service = %name, error = %e, "Service failed to start");
                LifecycleError::Callback(e)
            })?
        };

        self.values[index] = Some(value);
        tracing::info!(service = %name, "Service started");
        Ok(())
    }

    fn stop_at(&mut self, index: usize) -> Result<(), LifecycleError> {
        let name = self.config.name_at(index);
        let Some(value) = self.values[index].as_ref() else {
            tracing::trace!(service = %name, "Already stopped");
            return Ok(());
        };

        if let Some(behavior) = self.behaviors.get(name) {
            tracing::debug!(service = %name, "Stopping service");
            let deps = dependency_view(&self.config, self.graph.dependencies(index), &self.values);
            behavior.stop(value, &deps).map_err(|e| {
                tracing::error!(service = %name, error = %e, "Service failed to stop");
                LifecycleError::Callback(e)
            })?;
        }

        self.values[index] = None;
        tracing::info!(service = %name, "Service stopped");
        Ok(())
    }
}

fn dependency_view<'a, V>(
    config: &'a ServiceConfig,
    dependencies: &[usize],
    values: &'a [Option<V>],
) -> Dependencies<'a, V> {
    Dependencies::new(
        dependencies
            .iter()
            .map(|&d| (config.name_at(d), values[d].as_ref()))
            .collect(),
    )
}

impl<V> fmt::Display for System<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "System")?;
        let mut running = self.running().peekable();
        if running.peek().is_none() {
            return Ok(());
        }
        write!(f, "{{")?;
        for (i, name) in running.enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", name)?;
        }
        write!(f, "}}")
    }
}

impl<V> fmt::Debug for System<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("System")
            .field("order", &self.order().collect::<Vec<_>>())
            .field("running", &self.running().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Serializes the configuration only; values and behaviors are runtime state.
impl<V> Serialize for System<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.config.serialize(serializer)
    }
}
