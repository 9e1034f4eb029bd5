//! Error taxonomy for the stop-loss engine.
//!
//! | Code | Surfaced to caller | Handling |
//! |------|--------------------|----------|
//! | `DATA_UNAVAILABLE` | only from collaborator fetches | signal source skipped |
//! | `CONTRACT_NOT_FOUND` | yes | caller error |
//! | `NUMERICAL_INSTABILITY` | never from the engine | delta / intrinsic fallback |
//! | `INVALID_INPUT` | yes | malformed series or contract |
//! | `CONFIG_ERROR` | yes | configuration rejected at load |
//!
//! A policy-cap violation is not an error: it is a value produced by the
//! buffer policy (see `domain::stop_loss::buffer_policy::CapCheck`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;

/// Stable error codes for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Not enough price history for an analysis.
    DataUnavailable,
    /// The requested option contract does not exist.
    ContractNotFound,
    /// Pricing-model inputs are out of domain.
    NumericalInstability,
    /// Malformed price series or contract.
    InvalidInput,
    /// Configuration could not be loaded or validated.
    ConfigError,
}

impl ErrorCode {
    /// Get the reason string for this code.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::DataUnavailable => "DATA_UNAVAILABLE",
            Self::ContractNotFound => "CONTRACT_NOT_FOUND",
            Self::NumericalInstability => "NUMERICAL_INSTABILITY",
            Self::InvalidInput => "INVALID_INPUT",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Errors produced by the stop-loss engine and its collaborators.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Insufficient price history for a given analysis.
    #[error("{signal} unavailable: requires {required} candles, have {available}")]
    DataUnavailable {
        /// Analysis that could not run.
        signal: String,
        /// Candles required.
        required: usize,
        /// Candles available.
        available: usize,
    },

    /// The option contract could not be found.
    #[error("Option contract not found: {ticker} {strike} {option_type} {expiration}")]
    ContractNotFound {
        /// Underlying ticker.
        ticker: String,
        /// Strike price.
        strike: f64,
        /// CALL or PUT.
        option_type: String,
        /// Expiration date (YYYY-MM-DD).
        expiration: String,
    },

    /// Pricing-model inputs out of domain (e.g. sigma = 0, T < 0).
    #[error("Numerical instability: {reason}")]
    NumericalInstability {
        /// Description of the offending input.
        reason: String,
    },

    /// Malformed input.
    #[error("Invalid input for {field}: {message}")]
    InvalidInput {
        /// Offending field.
        field: String,
        /// Details.
        message: String,
    },

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Insufficient data for an analysis.
    #[must_use]
    pub fn data_unavailable(signal: impl Into<String>, required: usize, available: usize) -> Self {
        Self::DataUnavailable {
            signal: signal.into(),
            required,
            available,
        }
    }

    /// Malformed input.
    #[must_use]
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Pricing inputs out of domain.
    #[must_use]
    pub fn numerical(reason: impl Into<String>) -> Self {
        Self::NumericalInstability {
            reason: reason.into(),
        }
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::DataUnavailable { .. } => ErrorCode::DataUnavailable,
            Self::ContractNotFound { .. } => ErrorCode::ContractNotFound,
            Self::NumericalInstability { .. } => ErrorCode::NumericalInstability,
            Self::InvalidInput { .. } => ErrorCode::InvalidInput,
            Self::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Whether the engine recovers from this error locally.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DataUnavailable { .. } | Self::NumericalInstability { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            EngineError::data_unavailable("atr", 14, 3).code(),
            ErrorCode::DataUnavailable
        );
        assert_eq!(
            EngineError::numerical("sigma must be positive").code(),
            ErrorCode::NumericalInstability
        );
        assert_eq!(
            EngineError::invalid_input("strike", "must be positive").code(),
            ErrorCode::InvalidInput
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(EngineError::data_unavailable("atr", 14, 3).is_recoverable());
        assert!(EngineError::numerical("T < 0").is_recoverable());
        assert!(!EngineError::invalid_input("series", "empty").is_recoverable());

        let not_found = EngineError::ContractNotFound {
            ticker: "SPY".to_string(),
            strike: 496.0,
            option_type: "PUT".to_string(),
            expiration: "2026-10-18".to_string(),
        };
        assert!(!not_found.is_recoverable());
        assert_eq!(not_found.code().reason(), "CONTRACT_NOT_FOUND");
    }

    #[test]
    fn test_error_display() {
        let err = EngineError::data_unavailable("atr_14", 14, 5);
        assert_eq!(
            err.to_string(),
            "atr_14 unavailable: requires 14 candles, have 5"
        );

        let err = EngineError::invalid_input("underlying_price", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid input for underlying_price: must be positive"
        );
    }
}
