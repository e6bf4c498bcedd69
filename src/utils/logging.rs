//! Structured logging setup
//!
//! The router emits `tracing` events with provider, attempt and delay
//! fields. Binaries and tests call [`init_tracing`] once to print them.

use tracing_subscriber::EnvFilter;

use crate::utils::error::{ClientError, Result};

/// Default filter when neither `RUST_LOG` nor an explicit filter is set
pub const DEFAULT_FILTER: &str = "litellm_dispatch=info";

/// Install a global fmt subscriber
///
/// `filter` takes precedence, then `RUST_LOG`, then [`DEFAULT_FILTER`].
/// Fails if a global subscriber is already installed.
pub fn init_tracing(filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| ClientError::Logging(format!("invalid filter '{}': {}", directives, e)))?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .try_init()
        .map_err(|e| ClientError::Logging(e.to_string()))
}

/// Install the test subscriber, ignoring repeat calls
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("litellm_dispatch=debug"))
        .with_test_writer()
        .try_init();
}
