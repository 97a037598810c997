//! Structured logging.
//!
//! # Responsibilities
//! - Initialize a tracing subscriber for hosts and tests
//! - Honour `RUST_LOG`, falling back to a caller-supplied directive

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "service_system=info";

/// Install a global fmt subscriber filtered by `RUST_LOG` or `default_filter`.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
