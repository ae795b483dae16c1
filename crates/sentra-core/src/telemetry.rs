//! Tracing subscriber initialization.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber from logging configuration.
///
/// `RUST_LOG` takes precedence over the configured level. Safe to call
/// more than once; subsequent calls are no-ops.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    if config.format == "json" {
        let _ = tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init();
    }
}
