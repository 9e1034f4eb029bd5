//! Implied volatility recovery from the quoted option premium.
//!
//! Used when a contract arrives without an implied volatility:
//! - Newton-Raphson from a Corrado-Miller initial guess near the money
//! - Bisection far from the money, or when Newton-Raphson stalls on low vega

#![allow(clippy::many_single_char_names)]

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::market_data::OptionType;
use crate::error::EngineError;

use super::black_scholes::{raw_price, raw_vega};

/// Errors from IV computation.
#[derive(Debug, Error)]
pub enum IvError {
    /// Convergence failed after max iterations.
    #[error(
        "IV solver failed to converge after {iterations} iterations (last error: {last_error:.6})"
    )]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// Last price error.
        last_error: f64,
    },

    /// Invalid input parameters.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Error message.
        message: String,
    },

    /// No solution exists (e.g., price below intrinsic value).
    #[error("No valid IV solution: {reason}")]
    NoSolution {
        /// Reason no solution exists.
        reason: String,
    },
}

impl From<IvError> for EngineError {
    fn from(err: IvError) -> Self {
        Self::numerical(err.to_string())
    }
}

/// Configuration for the IV solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IvSolverConfig {
    /// Maximum iterations per method.
    pub max_iterations: u32,
    /// Convergence tolerance (absolute price error).
    pub tolerance: f64,
    /// Lower volatility bound.
    pub min_vol: f64,
    /// Upper volatility bound.
    pub max_vol: f64,
    /// |ln(S/K)| above which bisection is used directly.
    pub hybrid_threshold: f64,
}

impl Default for IvSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-8,
            min_vol: 0.001,
            max_vol: 5.0,
            hybrid_threshold: 0.20,
        }
    }
}

/// Hybrid Newton-Raphson / bisection implied volatility solver.
#[derive(Debug, Clone, Default)]
pub struct IvSolver {
    config: IvSolverConfig,
}

impl IvSolver {
    /// Create a solver.
    #[must_use]
    pub const fn new(config: IvSolverConfig) -> Self {
        Self { config }
    }

    /// Solve for sigma such that the model price equals `market_price`.
    ///
    /// # Errors
    /// Returns an error for invalid inputs, a premium below discounted
    /// intrinsic value, or non-convergence.
    #[allow(clippy::too_many_arguments)]
    pub fn solve(
        &self,
        market_price: f64,
        s: f64,
        k: f64,
        t: f64,
        r: f64,
        q: f64,
        option_type: OptionType,
    ) -> Result<f64, IvError> {
        Self::validate_inputs(market_price, s, k, t)?;

        let intrinsic = match option_type {
            OptionType::Call => (s * (-q * t).exp() - k * (-r * t).exp()).max(0.0),
            OptionType::Put => (k * (-r * t).exp() - s * (-q * t).exp()).max(0.0),
        };
        if market_price < intrinsic - self.config.tolerance {
            return Err(IvError::NoSolution {
                reason: format!(
                    "Market price ({market_price:.4}) is below intrinsic value ({intrinsic:.4})"
                ),
            });
        }

        if (s / k).ln().abs() > self.config.hybrid_threshold {
            self.bisection(market_price, s, k, t, r, q, option_type)
        } else {
            let guess = self.corrado_miller_guess(market_price, s, k, t, r, q, option_type);
            self.newton_raphson(market_price, s, k, t, r, q, option_type, guess)
                .or_else(|_| self.bisection(market_price, s, k, t, r, q, option_type))
        }
    }

    fn validate_inputs(market_price: f64, s: f64, k: f64, t: f64) -> Result<(), IvError> {
        for (name, value) in [
            ("Market price", market_price),
            ("Stock price", s),
            ("Strike price", k),
            ("Time to expiration", t),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(IvError::InvalidInput {
                    message: format!("{name} must be positive, got: {value}"),
                });
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn corrado_miller_guess(
        &self,
        market_price: f64,
        s: f64,
        k: f64,
        t: f64,
        r: f64,
        q: f64,
        option_type: OptionType,
    ) -> f64 {
        let f = s * ((r - q) * t).exp();
        let df = (-r * t).exp();

        // Put-call parity to a call premium.
        let call_price = match option_type {
            OptionType::Call => market_price,
            OptionType::Put => market_price + df * (f - k),
        };

        let x = f - k;
        let y = call_price / df;
        if y <= 0.0 {
            return 0.30;
        }

        let numerator = y - 0.5 * x;
        let sqrt_term = numerator.powi(2) - x.powi(2) / PI;
        if sqrt_term < 0.0 {
            return 0.30;
        }

        let sigma = (PI / (2.0 * t)).sqrt() * (numerator + sqrt_term.sqrt()) / f;
        sigma.clamp(self.config.min_vol, self.config.max_vol)
    }

    #[allow(clippy::too_many_arguments)]
    fn newton_raphson(
        &self,
        market_price: f64,
        s: f64,
        k: f64,
        t: f64,
        r: f64,
        q: f64,
        option_type: OptionType,
        initial_guess: f64,
    ) -> Result<f64, IvError> {
        let mut sigma = initial_guess.clamp(self.config.min_vol, self.config.max_vol);

        for i in 0..self.config.max_iterations {
            let error = raw_price(s, k, t, r, q, sigma, option_type) - market_price;
            if error.abs() < self.config.tolerance {
                return Ok(sigma);
            }

            let vega = raw_vega(s, k, t, r, q, sigma);
            if vega.abs() < 1e-12 {
                return Err(IvError::ConvergenceFailed {
                    iterations: i,
                    last_error: error.abs(),
                });
            }

            sigma = (sigma - error / vega).clamp(self.config.min_vol, self.config.max_vol);
        }

        Err(IvError::ConvergenceFailed {
            iterations: self.config.max_iterations,
            last_error: (raw_price(s, k, t, r, q, sigma, option_type) - market_price).abs(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn bisection(
        &self,
        market_price: f64,
        s: f64,
        k: f64,
        t: f64,
        r: f64,
        q: f64,
        option_type: OptionType,
    ) -> Result<f64, IvError> {
        let mut low = self.config.min_vol;
        let mut high = self.config.max_vol;

        let price_low = raw_price(s, k, t, r, q, low, option_type);
        let price_high = raw_price(s, k, t, r, q, high, option_type);
        if market_price < price_low {
            return Err(IvError::NoSolution {
                reason: format!(
                    "Market price ({market_price:.4}) is below minimum theoretical price ({price_low:.4})"
                ),
            });
        }
        if market_price > price_high {
            return Err(IvError::NoSolution {
                reason: format!(
                    "Market price ({market_price:.4}) exceeds maximum theoretical price ({price_high:.4})"
                ),
            });
        }

        for _ in 0..self.config.max_iterations {
            let mid = low.midpoint(high);
            let error = raw_price(s, k, t, r, q, mid, option_type) - market_price;
            if error.abs() < self.config.tolerance || (high - low) < 1e-10 {
                return Ok(mid);
            }
            if error > 0.0 {
                high = mid;
            } else {
                low = mid;
            }
        }

        Err(IvError::ConvergenceFailed {
            iterations: self.config.max_iterations,
            last_error: (raw_price(s, k, t, r, q, low.midpoint(high), option_type) - market_price)
                .abs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::black_scholes::price;

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    fn round_trip(s: f64, k: f64, t: f64, r: f64, q: f64, iv: f64, option_type: OptionType) -> f64 {
        let market = price(s, k, t, r, q, iv, option_type).unwrap();
        match IvSolver::default().solve(market, s, k, t, r, q, option_type) {
            Ok(v) => v,
            Err(e) => panic!("solver should converge: {e}"),
        }
    }

    #[test]
    fn test_atm_put_near_expiry() {
        // Two days out, like a short-dated scalp.
        let iv = round_trip(496.48, 496.0, 2.0 / 365.0, 0.05, 0.0, 0.35, OptionType::Put);
        assert!(approx_eq(iv, 0.35, 0.001));
    }

    #[test]
    fn test_atm_call() {
        let iv = round_trip(100.0, 100.0, 1.0, 0.05, 0.0, 0.25, OptionType::Call);
        assert!(approx_eq(iv, 0.25, 0.001));
    }

    #[test]
    fn test_otm_call_uses_bisection() {
        let iv = round_trip(100.0, 130.0, 0.25, 0.05, 0.0, 0.35, OptionType::Call);
        assert!(approx_eq(iv, 0.35, 0.01));
    }

    #[test]
    fn test_below_intrinsic_has_no_solution() {
        let result = IvSolver::default().solve(15.0, 120.0, 100.0, 0.5, 0.05, 0.0, OptionType::Call);
        assert!(matches!(result, Err(IvError::NoSolution { .. })));
    }

    #[test]
    fn test_invalid_price_rejected() {
        let result = IvSolver::default().solve(-1.0, 100.0, 100.0, 1.0, 0.05, 0.0, OptionType::Call);
        assert!(matches!(result, Err(IvError::InvalidInput { .. })));
    }

    #[test]
    fn test_maps_to_numerical_instability() {
        let err: EngineError = IvError::NoSolution {
            reason: "test".to_string(),
        }
        .into();
        assert!(err.is_recoverable());
    }
}
