//! Dependency resolution.
//!
//! # Responsibilities
//! - Derive `dependency → dependent` edges from configuration
//! - Resolve dependency names to service positions
//! - Produce a deterministic topological start order
//!
//! # Design Decisions
//! - Kahn's algorithm with a min-heap on declaration position: among ready
//!   services the earliest declared goes first
//! - A service depending on itself is a cycle

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use thiserror::Error;

use crate::config::ServiceConfig;

/// Errors raised while resolving the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The listed services sit on, or behind, a dependency cycle.
    #[error("dependency cycle among services: {}", .0.join(", "))]
    Cycle(Vec<String>),

    #[error("service `{service}` depends on unknown service `{dependency}`")]
    UnknownDependency { service: String, dependency: String },
}

/// Names `name` depends on, in declaration order.
///
/// Empty when the service declares no dependencies or is not configured.
pub fn dependencies_of<'a>(config: &'a ServiceConfig, name: &str) -> &'a [String] {
    config
        .get(name)
        .map(|record| record.dependencies())
        .unwrap_or(&[])
}

/// Every `(dependency, dependent)` edge, in declaration order.
pub fn edges_of(config: &ServiceConfig) -> Vec<(&str, &str)> {
    config
        .iter()
        .flat_map(|(name, record)| {
            record
                .dependencies()
                .iter()
                .map(move |dependency| (dependency.as_str(), name))
        })
        .collect()
}

/// Start order for `config`: every dependency precedes its dependents.
pub fn sorted_order(config: &ServiceConfig) -> Result<Vec<String>, GraphError> {
    let graph = DependencyGraph::build(config)?;
    let order = graph.sorted()?;
    Ok(order
        .into_iter()
        .map(|i| config.name_at(i).to_string())
        .collect())
}

/// Dependency graph over service positions in a [`ServiceConfig`].
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    names: Vec<String>,
    /// Direct dependencies per service.
    dependencies: Vec<Vec<usize>>,
    /// Direct dependents per service.
    dependents: Vec<Vec<usize>>,
}

impl DependencyGraph {
    /// Resolve every declared dependency to a service position.
    pub fn build(config: &ServiceConfig) -> Result<Self, GraphError> {
        let mut dependencies = Vec::with_capacity(config.len());
        let mut dependents = vec![Vec::new(); config.len()];

        for (i, (name, record)) in config.iter().enumerate() {
            let mut direct = Vec::with_capacity(record.dependencies().len());
            for dependency in record.dependencies() {
                let d = config
                    .position(dependency)
                    .ok_or_else(|| GraphError::UnknownDependency {
                        service: name.to_string(),
                        dependency: dependency.clone(),
                    })?;
                // A repeated declaration adds no second edge.
                if !direct.contains(&d) {
                    direct.push(d);
                    dependents[d].push(i);
                }
            }
            dependencies.push(direct);
        }

        Ok(Self {
            names: config.names().map(str::to_string).collect(),
            dependencies,
            dependents,
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Direct dependencies of the service at `index`.
    pub fn dependencies(&self, index: usize) -> &[usize] {
        &self.dependencies[index]
    }

    /// Direct dependents of the service at `index`.
    pub fn dependents(&self, index: usize) -> &[usize] {
        &self.dependents[index]
    }

    /// `(dependency, dependent)` position pairs.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.dependencies
            .iter()
            .enumerate()
            .flat_map(|(i, deps)| deps.iter().map(move |&d| (d, i)))
    }

    /// Topologically sorted positions.
    pub fn sorted(&self) -> Result<Vec<usize>, GraphError> {
        let mut in_degree: Vec<usize> = self.dependencies.iter().map(Vec::len).collect();
        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &deg)| deg == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(self.len());
        while let Some(Reverse(i)) = ready.pop() {
            order.push(i);
            for &dependent in &self.dependents[i] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if order.len() < self.len() {
            let stuck = in_degree
                .iter()
                .enumerate()
                .filter(|(_, &deg)| deg > 0)
                .map(|(i, _)| self.names[i].clone())
                .collect();
            return Err(GraphError::Cycle(stuck));
        }

        Ok(order)
    }
}
