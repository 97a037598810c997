//! Service behavior registry.
//!
//! A [`Behavior`] pairs a mandatory start callback with an optional stop
//! callback. Callbacks are supplied by the caller and never inspected.

use std::collections::HashMap;
use std::fmt;

use crate::config::{ServiceConfig, ServiceRecord};

/// Error type returned by user callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type StartFn<V> = Box<dyn Fn(&StartContext<'_, V>) -> Result<V, BoxError> + Send + Sync>;
type StopFn<V> = Box<dyn Fn(&V, &Dependencies<'_, V>) -> Result<(), BoxError> + Send + Sync>;

/// Current values of a service's direct dependencies.
///
/// During start every entry is `Some`. During stop an entry is `None` when
/// that dependency was already stopped.
pub struct Dependencies<'a, V> {
    entries: Vec<(&'a str, Option<&'a V>)>,
}

impl<'a, V> Dependencies<'a, V> {
    pub(crate) fn new(entries: Vec<(&'a str, Option<&'a V>)>) -> Self {
        Self { entries }
    }

    /// Value of the named dependency, if it is a dependency and running.
    pub fn get(&self, name: &str) -> Option<&'a V> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, value)| *value)
    }

    /// `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Option<&'a V>)> + '_ {
        self.entries.iter().copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: fmt::Debug> fmt::Debug for Dependencies<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter().copied()).finish()
    }
}

/// Everything a start callback may read.
pub struct StartContext<'a, V> {
    pub(crate) name: &'a str,
    pub(crate) record: &'a ServiceRecord,
    pub(crate) config: &'a ServiceConfig,
    pub(crate) deps: Dependencies<'a, V>,
}

impl<'a, V> StartContext<'a, V> {
    /// Name of the service being started.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The service's own configuration record.
    pub fn record(&self) -> &'a ServiceRecord {
        self.record
    }

    /// The whole service configuration.
    pub fn config(&self) -> &'a ServiceConfig {
        self.config
    }

    /// Values of the direct dependencies, all running.
    pub fn deps(&self) -> &Dependencies<'a, V> {
        &self.deps
    }
}

/// Start and stop callbacks of one service.
pub struct Behavior<V> {
    start: StartFn<V>,
    stop: Option<StopFn<V>>,
}

impl<V> Behavior<V> {
    /// Create a behavior from its start callback.
    pub fn new<F>(start: F) -> Self
    where
        F: Fn(&StartContext<'_, V>) -> Result<V, BoxError> + Send + Sync + 'static,
    {
        Self {
            start: Box::new(start),
            stop: None,
        }
    }

    /// Attach a stop callback. Its success value is discarded.
    pub fn with_stop<F>(mut self, stop: F) -> Self
    where
        F: Fn(&V, &Dependencies<'_, V>) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.stop = Some(Box::new(stop));
        self
    }

    pub fn has_stop(&self) -> bool {
        self.stop.is_some()
    }

    pub(crate) fn start(&self, ctx: &StartContext<'_, V>) -> Result<V, BoxError> {
        (self.start)(ctx)
    }

    /// Runs the stop callback; a missing callback succeeds.
    pub(crate) fn stop(&self, value: &V, deps: &Dependencies<'_, V>) -> Result<(), BoxError> {
        match &self.stop {
            Some(stop) => stop(value, deps),
            None => Ok(()),
        }
    }
}

impl<V> fmt::Debug for Behavior<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("has_stop", &self.has_stop())
            .finish_non_exhaustive()
    }
}

/// Behaviors keyed by service name.
pub struct Behaviors<V> {
    entries: HashMap<String, Behavior<V>>,
}

impl<V> Behaviors<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Builder form of [`Behaviors::insert`].
    pub fn with(mut self, name: impl Into<String>, behavior: Behavior<V>) -> Self {
        self.insert(name, behavior);
        self
    }

    /// Register a behavior, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, behavior: Behavior<V>) -> Option<Behavior<V>> {
        self.entries.insert(name.into(), behavior)
    }

    pub fn get(&self, name: &str) -> Option<&Behavior<V>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for Behaviors<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Behaviors<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}
