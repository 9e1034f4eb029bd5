//! Option price at a stop level.
//!
//! Method selection, in order:
//! 1. At or past expiry (T <= epsilon): intrinsic value.
//! 2. Black-Scholes with the quoted IV, or one solved from the premium.
//! 3. Delta approximation with the quoted delta, or the model delta.
//! 4. Intrinsic value.
//!
//! Near expiry and near the money the delta approximation is never used:
//! without a volatility the projector prices at intrinsic value instead.
//! Every estimate is floored at the minimum tick.

use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;
use crate::domain::market_data::OptionContract;

use super::black_scholes::{self, DAYS_PER_YEAR};
use super::iv::IvSolver;

/// How an option price was estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingMethod {
    /// Full Black-Scholes repricing.
    BlackScholes,
    /// First-order delta move from the current premium.
    DeltaApproximation,
    /// max(0, S - K) or max(0, K - S).
    IntrinsicValue,
}

impl std::fmt::Display for PricingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BlackScholes => "Black-Scholes",
            Self::DeltaApproximation => "delta approximation",
            Self::IntrinsicValue => "intrinsic value",
        };
        f.write_str(s)
    }
}

/// Estimated option price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionPriceEstimate {
    /// Estimated premium, floored at the minimum tick.
    pub price: f64,
    /// Method used.
    pub method: PricingMethod,
    /// Volatility used by the model, when any.
    pub volatility: Option<f64>,
}

/// Prices a contract at a hypothetical underlying price.
#[derive(Debug, Clone)]
pub struct OptionPriceProjector {
    config: PricingConfig,
    solver: IvSolver,
}

impl Default for OptionPriceProjector {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}

impl OptionPriceProjector {
    /// Create a projector.
    #[must_use]
    pub fn new(config: PricingConfig) -> Self {
        Self {
            config,
            solver: IvSolver::default(),
        }
    }

    /// Pricing configuration in use.
    #[must_use]
    pub const fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Year fraction for a DTE.
    #[must_use]
    pub fn years(dte: u32) -> f64 {
        f64::from(dte) / DAYS_PER_YEAR
    }

    /// Near expiry and near the money: full model pricing is mandatory.
    #[must_use]
    pub fn requires_full_model(&self, contract: &OptionContract, dte: u32) -> bool {
        dte <= self.config.near_expiry_dte
            && contract.moneyness_distance() <= self.config.at_the_money_band
    }

    /// Quoted IV, or one solved from the current premium.
    #[must_use]
    pub fn volatility(&self, contract: &OptionContract, dte: u32) -> Option<f64> {
        if let Some(iv) = contract.implied_volatility.filter(|v| *v > 0.0) {
            return Some(iv);
        }
        let t = Self::years(dte);
        match self.solver.solve(
            contract.current_option_price,
            contract.underlying_price,
            contract.strike,
            t,
            self.config.risk_free_rate,
            self.config.dividend_yield,
            contract.option_type,
        ) {
            Ok(iv) => {
                tracing::debug!(iv, "Implied volatility solved from premium");
                Some(iv)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Implied volatility unavailable");
                None
            }
        }
    }

    /// Quoted |delta|, or the model delta.
    #[must_use]
    pub fn delta_magnitude(&self, contract: &OptionContract, dte: u32, sigma: Option<f64>) -> Option<f64> {
        if let Some(d) = contract.delta.filter(|d| d.is_finite()) {
            return Some(d.abs());
        }
        let sigma = sigma?;
        black_scholes::delta(
            contract.underlying_price,
            contract.strike,
            Self::years(dte),
            self.config.risk_free_rate,
            self.config.dividend_yield,
            sigma,
            contract.option_type,
        )
        .ok()
        .map(f64::abs)
    }

    /// Quoted theta per day, or the model theta.
    #[must_use]
    pub fn theta_per_day(&self, contract: &OptionContract, dte: u32) -> Option<f64> {
        if let Some(theta) = contract.theta.filter(|t| t.is_finite()) {
            return Some(theta);
        }
        let sigma = self.volatility(contract, dte)?;
        black_scholes::theta_per_day(
            contract.underlying_price,
            contract.strike,
            Self::years(dte),
            self.config.risk_free_rate,
            self.config.dividend_yield,
            sigma,
            contract.option_type,
        )
        .ok()
    }

    /// First-order estimate: premium + (stop - S) * |delta| * sign.
    #[must_use]
    pub fn delta_approximation(&self, contract: &OptionContract, stop_price: f64, delta: f64) -> f64 {
        let moved = contract.current_option_price
            + (stop_price - contract.underlying_price) * delta.abs() * contract.option_type.sign();
        moved.max(self.config.min_tick)
    }

    /// Estimate the premium if the underlying moves to `stop_price`.
    #[must_use]
    pub fn price_at(&self, contract: &OptionContract, stop_price: f64, dte: u32) -> OptionPriceEstimate {
        let t = Self::years(dte);
        if t <= self.config.expiry_epsilon_years {
            return self.intrinsic(contract, stop_price);
        }

        let sigma = self.volatility(contract, dte);
        if let Some(sigma) = sigma {
            match black_scholes::price(
                stop_price,
                contract.strike,
                t,
                self.config.risk_free_rate,
                self.config.dividend_yield,
                sigma,
                contract.option_type,
            ) {
                Ok(price) => {
                    return OptionPriceEstimate {
                        price: price.max(self.config.min_tick),
                        method: PricingMethod::BlackScholes,
                        volatility: Some(sigma),
                    };
                }
                Err(e) => tracing::debug!(error = %e, "Black-Scholes failed, falling back"),
            }
        }

        if self.requires_full_model(contract, dte) {
            tracing::warn!(
                dte,
                strike = contract.strike,
                underlying = contract.underlying_price,
                "Near-expiry at-the-money option without volatility, pricing at intrinsic value"
            );
            return self.intrinsic(contract, stop_price);
        }

        if let Some(delta) = self.delta_magnitude(contract, dte, sigma) {
            return OptionPriceEstimate {
                price: self.delta_approximation(contract, stop_price, delta),
                method: PricingMethod::DeltaApproximation,
                volatility: None,
            };
        }

        self.intrinsic(contract, stop_price)
    }

    fn intrinsic(&self, contract: &OptionContract, stop_price: f64) -> OptionPriceEstimate {
        OptionPriceEstimate {
            price: contract
                .option_type
                .intrinsic(stop_price, contract.strike)
                .max(self.config.min_tick),
            method: PricingMethod::IntrinsicValue,
            volatility: None,
        }
    }
}
