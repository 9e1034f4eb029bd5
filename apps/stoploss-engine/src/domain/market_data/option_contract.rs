//! Option contract value object.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Option right (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionType {
    /// Call option (long calls stop out below the current price).
    Call,
    /// Put option (long puts stop out above the current price).
    Put,
}

impl OptionType {
    /// +1 for calls, -1 for puts.
    ///
    /// Direction of option value change for a rising underlying, and the side
    /// of the current price a stop sits on (negated).
    #[must_use]
    pub const fn sign(&self) -> f64 {
        match self {
            Self::Call => 1.0,
            Self::Put => -1.0,
        }
    }

    /// Intrinsic value at underlying price `s` for strike `k`.
    #[must_use]
    pub fn intrinsic(&self, s: f64, k: f64) -> f64 {
        match self {
            Self::Call => (s - k).max(0.0),
            Self::Put => (k - s).max(0.0),
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "CALL"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

/// Option contract snapshot for one recommendation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Underlying symbol.
    #[serde(default)]
    pub underlying: String,
    /// Current underlying price.
    pub underlying_price: f64,
    /// Strike price.
    pub strike: f64,
    /// Call or put.
    pub option_type: OptionType,
    /// Days to expiration (`None` when unknown).
    #[serde(default)]
    pub days_to_expiration: Option<u32>,
    /// Implied volatility (annualized, e.g. 0.35).
    #[serde(default)]
    pub implied_volatility: Option<f64>,
    /// Current option premium.
    pub current_option_price: f64,
    /// Delta as quoted (sign is ignored; direction comes from `option_type`).
    #[serde(default)]
    pub delta: Option<f64>,
    /// Theta per calendar day as quoted.
    #[serde(default)]
    pub theta: Option<f64>,
}

impl OptionContract {
    /// Create a contract with only the required fields set.
    #[must_use]
    pub fn new(
        underlying_price: f64,
        strike: f64,
        option_type: OptionType,
        current_option_price: f64,
    ) -> Self {
        Self {
            underlying: String::new(),
            underlying_price,
            strike,
            option_type,
            days_to_expiration: None,
            implied_volatility: None,
            current_option_price,
            delta: None,
            theta: None,
        }
    }

    /// Set the underlying symbol.
    #[must_use]
    pub fn with_underlying(mut self, underlying: impl Into<String>) -> Self {
        self.underlying = underlying.into();
        self
    }

    /// Set days to expiration.
    #[must_use]
    pub const fn with_dte(mut self, days: u32) -> Self {
        self.days_to_expiration = Some(days);
        self
    }

    /// Set implied volatility.
    #[must_use]
    pub const fn with_iv(mut self, iv: f64) -> Self {
        self.implied_volatility = Some(iv);
        self
    }

    /// Set quoted delta and theta.
    #[must_use]
    pub const fn with_greeks(mut self, delta: f64, theta: f64) -> Self {
        self.delta = Some(delta);
        self.theta = Some(theta);
        self
    }

    /// Check if this is a call option.
    #[must_use]
    pub const fn is_call(&self) -> bool {
        matches!(self.option_type, OptionType::Call)
    }

    /// Distance of the strike from the underlying, as a fraction of the strike.
    #[must_use]
    pub fn moneyness_distance(&self) -> f64 {
        ((self.underlying_price - self.strike) / self.strike).abs()
    }

    /// Validate required fields.
    ///
    /// # Errors
    /// Returns `InvalidInput` for non-finite or non-positive prices.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.underlying_price.is_finite() || self.underlying_price <= 0.0 {
            return Err(EngineError::invalid_input(
                "underlying_price",
                format!("must be positive, got: {}", self.underlying_price),
            ));
        }
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(EngineError::invalid_input(
                "strike",
                format!("must be positive, got: {}", self.strike),
            ));
        }
        if !self.current_option_price.is_finite() || self.current_option_price < 0.0 {
            return Err(EngineError::invalid_input(
                "current_option_price",
                format!("must be non-negative, got: {}", self.current_option_price),
            ));
        }
        if let Some(iv) = self.implied_volatility {
            if !iv.is_finite() || iv < 0.0 {
                return Err(EngineError::invalid_input(
                    "implied_volatility",
                    format!("must be non-negative, got: {iv}"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsic() {
        assert_eq!(OptionType::Call.intrinsic(105.0, 100.0), 5.0);
        assert_eq!(OptionType::Call.intrinsic(95.0, 100.0), 0.0);
        assert_eq!(OptionType::Put.intrinsic(95.0, 100.0), 5.0);
        assert_eq!(OptionType::Put.intrinsic(105.0, 100.0), 0.0);
    }

    #[test]
    fn test_moneyness_distance() {
        let contract = OptionContract::new(496.48, 496.0, OptionType::Put, 1.2);
        assert!(contract.moneyness_distance() < 0.005);
    }

    #[test]
    fn test_validate_rejects_bad_prices() {
        let contract = OptionContract::new(0.0, 100.0, OptionType::Call, 1.0);
        assert!(contract.validate().is_err());

        let contract = OptionContract::new(100.0, 100.0, OptionType::Call, -1.0);
        assert!(contract.validate().is_err());

        let contract = OptionContract::new(100.0, 100.0, OptionType::Call, 1.0).with_iv(f64::NAN);
        assert!(contract.validate().is_err());
    }

    #[test]
    fn test_deserialize_minimal() {
        let json = r#"{
            "underlying_price": 100.0,
            "strike": 100.0,
            "option_type": "CALL",
            "current_option_price": 2.5
        }"#;
        let contract: OptionContract = match serde_json::from_str(json) {
            Ok(c) => c,
            Err(e) => panic!("minimal contract should parse: {e}"),
        };
        assert!(contract.days_to_expiration.is_none());
        assert!(contract.is_call());
    }
}
