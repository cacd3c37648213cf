//! Structured logging setup.
//!
//! Driven by [`LoggingConfig`](crate::config::LoggingConfig); the
//! `RUST_LOG` environment variable overrides the configured level when
//! set, which is the usual way to turn on `debug` output for one module.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{ProtocolError, Result};

/// Install the global tracing subscriber.
///
/// Fails if a subscriber is already installed; call once at startup.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if config.json_format {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| ProtocolError::ConfigError(format!("failed to install logger: {e}")))
}
