//! Pricing model configuration for the option price projector.

use serde::{Deserialize, Serialize};

/// Pricing model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Risk-free rate (annualized).
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Continuous dividend yield.
    #[serde(default)]
    pub dividend_yield: f64,
    /// Time to expiry (years) at or below which options price at intrinsic value.
    #[serde(default = "default_expiry_epsilon_years")]
    pub expiry_epsilon_years: f64,
    /// Price floor for any projected option price.
    #[serde(default = "default_min_tick")]
    pub min_tick: f64,
    /// Contracts at or below this DTE may require full Black-Scholes.
    #[serde(default = "default_near_expiry_dte")]
    pub near_expiry_dte: u32,
    /// Moneyness band (fraction of strike) treated as at-the-money.
    #[serde(default = "default_at_the_money_band")]
    pub at_the_money_band: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            dividend_yield: 0.0,
            expiry_epsilon_years: default_expiry_epsilon_years(),
            min_tick: default_min_tick(),
            near_expiry_dte: default_near_expiry_dte(),
            at_the_money_band: default_at_the_money_band(),
        }
    }
}

const fn default_risk_free_rate() -> f64 {
    0.05
}

const fn default_expiry_epsilon_years() -> f64 {
    1e-6
}

const fn default_min_tick() -> f64 {
    0.01
}

const fn default_near_expiry_dte() -> u32 {
    1
}

const fn default_at_the_money_band() -> f64 {
    0.005
}
