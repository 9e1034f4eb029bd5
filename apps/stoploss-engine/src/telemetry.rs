//! Tracing Setup
//!
//! Installs a console subscriber for the binary. Library code only emits
//! `tracing` events and never installs a subscriber itself.
//!
//! # Configuration
//!
//! - `observability.logging.level`: default filter (e.g. `info`, `stoploss_engine=debug`)
//! - `observability.logging.format`: `pretty` or `json`
//! - `RUST_LOG`: overrides the configured level when set
//!
//! # Usage
//!
//! ```rust,ignore
//! use stoploss_engine::telemetry::init_telemetry;
//!
//! init_telemetry(&config.observability.logging)?;
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` if set and valid, else the configured level.
#[must_use]
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_telemetry(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = env_filter(config);
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    tracing::debug!(level = %config.level, format = %config.format, "Tracing initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_falls_back() {
        let config = LoggingConfig {
            level: "not a [valid filter".to_string(),
            format: "pretty".to_string(),
        };
        // Must not panic regardless of RUST_LOG.
        let _filter = env_filter(&config);
    }
}
