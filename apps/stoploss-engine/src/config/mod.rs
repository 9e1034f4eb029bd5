//! Configuration module for the stop-loss engine.
//!
//! Every policy constant and lookback the engine uses is named here rather
//! than scattered through the pipeline:
//!
//! - `engine.horizons.*.atr_window`: volatility smoothing length
//! - `engine.volume_confirmation_threshold`: candle-pattern strictness
//! - `buffer_policy.tiers`: risk tolerance per DTE and option type
//!
//! # Usage
//!
//! ```rust,ignore
//! use stoploss_engine::config::load_config;
//!
//! // Load from default path (stoploss.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/stoploss.yaml"))?;
//! ```

mod buffer_policy;
mod engine;
mod observability;
mod pricing;
mod projection;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use buffer_policy::{BufferCapTier, BufferPolicyConfig};
pub use engine::{EngineConfig, HorizonSettings, HorizonTable};
pub use observability::{LoggingConfig, ObservabilityConfig};
pub use pricing::PricingConfig;
pub use projection::ProjectionConfig;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "stoploss.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Signal lookbacks, pattern strictness, per-horizon buffers.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Buffer cap table.
    #[serde(default)]
    pub buffer_policy: BufferPolicyConfig,
    /// Option pricing model parameters.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Theta decay projection.
    #[serde(default)]
    pub projection: ProjectionConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to `stoploss.yaml`.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let engine = &config.engine;

    if engine.support_resistance_order == 0 {
        return Err(ConfigError::ValidationError(
            "engine.support_resistance_order must be at least 1".to_string(),
        ));
    }

    if engine.pattern_lookback == 0 || engine.volume_lookback == 0 {
        return Err(ConfigError::ValidationError(
            "engine.pattern_lookback and engine.volume_lookback must be at least 1".to_string(),
        ));
    }

    if engine.volume_confirmation_threshold < 1.0 {
        return Err(ConfigError::ValidationError(
            "engine.volume_confirmation_threshold must be at least 1.0".to_string(),
        ));
    }

    if !(0.0..1.0).contains(&engine.key_level_tolerance)
        || !(0.0..1.0).contains(&engine.conservative_default_pct)
    {
        return Err(ConfigError::ValidationError(
            "engine.key_level_tolerance and engine.conservative_default_pct must be between 0.0 and 1.0"
                .to_string(),
        ));
    }

    for (name, settings) in [
        ("scalp", &engine.horizons.scalp),
        ("swing", &engine.horizons.swing),
        ("longterm", &engine.horizons.longterm),
    ] {
        if settings.atr_window == 0 {
            return Err(ConfigError::ValidationError(format!(
                "engine.horizons.{name}.atr_window must be at least 1"
            )));
        }
        if !(settings.fixed_fallback_pct > 0.0 && settings.fixed_fallback_pct < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "engine.horizons.{name}.fixed_fallback_pct must be between 0.0 and 1.0"
            )));
        }
        if settings.support_resistance_atr_multiple < 0.0 || settings.volatility_atr_multiple <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "engine.horizons.{name} ATR multiples must be positive"
            )));
        }
    }

    config
        .buffer_policy
        .validate()
        .map_err(ConfigError::ValidationError)?;

    if config.pricing.risk_free_rate < 0.0 || config.pricing.risk_free_rate > 1.0 {
        return Err(ConfigError::ValidationError(
            "risk_free_rate must be between 0.0 and 1.0".to_string(),
        ));
    }

    if config.pricing.dividend_yield < 0.0 || config.pricing.dividend_yield > 1.0 {
        return Err(ConfigError::ValidationError(
            "dividend_yield must be between 0.0 and 1.0".to_string(),
        ));
    }

    if config.pricing.min_tick <= 0.0 {
        return Err(ConfigError::ValidationError(
            "pricing.min_tick must be positive".to_string(),
        ));
    }

    if config.projection.steps == 0 || config.projection.hours_per_day <= 0.0 {
        return Err(ConfigError::ValidationError(
            "projection.steps and projection.hours_per_day must be positive".to_string(),
        ));
    }

    let valid_formats = ["json", "pretty"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    Ok(())
}
