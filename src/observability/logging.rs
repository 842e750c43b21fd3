//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for test binaries
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the supplied default filter
//! - Initialization is idempotent; later calls are ignored

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a fmt subscriber with `default_filter` unless `RUST_LOG` is set.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init()
        .is_ok()
}
