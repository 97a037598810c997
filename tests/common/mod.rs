//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use service_system::{Behavior, Behaviors, BoxError, ServiceConfig, StartContext};

/// Counts callback invocations and records their order.
#[derive(Clone, Default)]
pub struct Recorder {
    starts: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
    events: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Wrap a start function so every call is counted.
    pub fn behavior<F>(&self, start: F) -> Behavior<i64>
    where
        F: Fn(&StartContext<'_, i64>) -> Result<i64, BoxError> + Send + Sync + 'static,
    {
        let recorder = self.clone();
        let stopper = self.clone();
        Behavior::new(move |ctx| {
            recorder.starts.fetch_add(1, Ordering::SeqCst);
            recorder.events.lock().unwrap().push(format!("start {}", ctx.name()));
            start(ctx)
        })
        .with_stop(move |value, _| {
            stopper.stops.fetch_add(1, Ordering::SeqCst);
            stopper.events.lock().unwrap().push(format!("stop {}", value));
            Ok(())
        })
    }
}

/// `val` field of the service's own record.
pub fn own_val(ctx: &StartContext<'_, i64>) -> Result<i64, BoxError> {
    ctx.record()
        .get("val")
        .and_then(|v| v.as_i64())
        .ok_or_else(|| format!("service `{}` has no integer `val`", ctx.name()).into())
}

/// Sum of the direct dependency values.
pub fn sum_of_deps(ctx: &StartContext<'_, i64>) -> Result<i64, BoxError> {
    Ok(ctx.deps().iter().filter_map(|(_, v)| v).sum())
}

/// The composition example: `sum` depends on `x` and `y`, `y` on `x`.
pub fn composition_config() -> ServiceConfig {
    ServiceConfig::from_value(serde_json::json!({
        "x": { "val": 1 },
        "y": { "val": 2, "depends": "x" },
        "sum": { "depends": ["x", "y"] },
    }))
    .unwrap()
}

pub fn composition_behaviors(recorder: &Recorder) -> Behaviors<i64> {
    Behaviors::new()
        .with("x", recorder.behavior(own_val))
        .with("y", recorder.behavior(own_val))
        .with("sum", recorder.behavior(sum_of_deps))
}
