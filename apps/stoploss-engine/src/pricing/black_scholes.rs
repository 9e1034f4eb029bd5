//! Black-Scholes model with continuous dividend yield.
//!
//! Prices, delta, theta and vega for European options. Inputs out of the
//! model's domain (sigma <= 0, T <= 0, non-positive prices) are reported as
//! `NumericalInstability` so callers can fall back.

// Black-Scholes uses standard mathematical notation (s, k, t, r, q, sigma)
#![allow(clippy::many_single_char_names)]

use std::f64::consts::{PI, SQRT_2};

use crate::domain::market_data::OptionType;
use crate::error::EngineError;

/// Calendar days per year used for T and per-day theta.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Standard normal CDF.
#[must_use]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + libm::erf(x / SQRT_2))
}

/// Standard normal PDF.
#[must_use]
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

fn d1(s: f64, k: f64, t: f64, r: f64, q: f64, sigma: f64) -> f64 {
    ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt())
}

fn d2(s: f64, k: f64, t: f64, r: f64, q: f64, sigma: f64) -> f64 {
    d1(s, k, t, r, q, sigma) - sigma * t.sqrt()
}

fn check_domain(s: f64, k: f64, t: f64, sigma: f64) -> Result<(), EngineError> {
    if !(s.is_finite() && s > 0.0) {
        return Err(EngineError::numerical(format!("spot must be positive, got {s}")));
    }
    if !(k.is_finite() && k > 0.0) {
        return Err(EngineError::numerical(format!("strike must be positive, got {k}")));
    }
    if !(t.is_finite() && t > 0.0) {
        return Err(EngineError::numerical(format!("time to expiry must be positive, got {t}")));
    }
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(EngineError::numerical(format!("volatility must be positive, got {sigma}")));
    }
    Ok(())
}

/// Unchecked price; callers validate the domain first.
pub(crate) fn raw_price(
    s: f64,
    k: f64,
    t: f64,
    r: f64,
    q: f64,
    sigma: f64,
    option_type: OptionType,
) -> f64 {
    let d1_val = d1(s, k, t, r, q, sigma);
    let d2_val = d2(s, k, t, r, q, sigma);
    match option_type {
        OptionType::Call => {
            s * (-q * t).exp() * norm_cdf(d1_val) - k * (-r * t).exp() * norm_cdf(d2_val)
        }
        OptionType::Put => {
            k * (-r * t).exp() * norm_cdf(-d2_val) - s * (-q * t).exp() * norm_cdf(-d1_val)
        }
    }
}

/// Unchecked vega (per 1.00 of volatility).
pub(crate) fn raw_vega(s: f64, k: f64, t: f64, r: f64, q: f64, sigma: f64) -> f64 {
    let d1_val = d1(s, k, t, r, q, sigma);
    s * (-q * t).exp() * norm_pdf(d1_val) * t.sqrt()
}

/// Option price.
///
/// # Errors
/// `NumericalInstability` when inputs are outside the model's domain.
#[allow(clippy::too_many_arguments)]
pub fn price(
    s: f64,
    k: f64,
    t: f64,
    r: f64,
    q: f64,
    sigma: f64,
    option_type: OptionType,
) -> Result<f64, EngineError> {
    check_domain(s, k, t, sigma)?;
    let value = raw_price(s, k, t, r, q, sigma, option_type);
    if value.is_finite() {
        Ok(value.max(0.0))
    } else {
        Err(EngineError::numerical("non-finite model price"))
    }
}

/// Delta (signed: positive for calls, negative for puts).
///
/// # Errors
/// `NumericalInstability` when inputs are outside the model's domain.
#[allow(clippy::too_many_arguments)]
pub fn delta(
    s: f64,
    k: f64,
    t: f64,
    r: f64,
    q: f64,
    sigma: f64,
    option_type: OptionType,
) -> Result<f64, EngineError> {
    check_domain(s, k, t, sigma)?;
    let carry = (-q * t).exp();
    let n1 = norm_cdf(d1(s, k, t, r, q, sigma));
    Ok(match option_type {
        OptionType::Call => carry * n1,
        OptionType::Put => carry * (n1 - 1.0),
    })
}

/// Theta per calendar day (negative for a decaying long option).
///
/// # Errors
/// `NumericalInstability` when inputs are outside the model's domain.
#[allow(clippy::too_many_arguments)]
pub fn theta_per_day(
    s: f64,
    k: f64,
    t: f64,
    r: f64,
    q: f64,
    sigma: f64,
    option_type: OptionType,
) -> Result<f64, EngineError> {
    check_domain(s, k, t, sigma)?;
    let d1_val = d1(s, k, t, r, q, sigma);
    let d2_val = d2(s, k, t, r, q, sigma);
    let spot_carry = s * (-q * t).exp();
    let strike_pv = k * (-r * t).exp();
    let decay = -spot_carry * norm_pdf(d1_val) * sigma / (2.0 * t.sqrt());
    let annual = match option_type {
        OptionType::Call => {
            decay - r * strike_pv * norm_cdf(d2_val) + q * spot_carry * norm_cdf(d1_val)
        }
        OptionType::Put => {
            decay + r * strike_pv * norm_cdf(-d2_val) - q * spot_carry * norm_cdf(-d1_val)
        }
    };
    Ok(annual / DAYS_PER_YEAR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    #[test]
    fn test_norm_cdf() {
        assert!(approx_eq(norm_cdf(0.0), 0.5, 1e-6));
        assert!(approx_eq(norm_cdf(1.96), 0.975, 0.001));
        assert!(approx_eq(norm_cdf(-1.96), 0.025, 0.001));
    }

    #[test]
    fn test_call_atm() {
        // Expected ~ 10.45 (from Black-Scholes tables)
        let p = price(100.0, 100.0, 1.0, 0.05, 0.0, 0.20, OptionType::Call).unwrap();
        assert!(approx_eq(p, 10.45, 0.1));
    }

    #[test]
    fn test_put_call_parity() {
        let (s, k, t, r, q, sigma) = (100.0, 95.0, 0.5, 0.03, 0.01, 0.3);
        let call = price(s, k, t, r, q, sigma, OptionType::Call).unwrap();
        let put = price(s, k, t, r, q, sigma, OptionType::Put).unwrap();
        let parity = s * (-q * t).exp() - k * (-r * t).exp();
        assert!(approx_eq(call - put, parity, 1e-9));
    }

    #[test]
    fn test_delta_bounds() {
        let call = delta(100.0, 100.0, 0.25, 0.05, 0.0, 0.25, OptionType::Call).unwrap();
        let put = delta(100.0, 100.0, 0.25, 0.05, 0.0, 0.25, OptionType::Put).unwrap();
        assert!(call > 0.5 && call < 0.6);
        assert!(approx_eq(call - put, 1.0, 1e-12));
    }

    #[test]
    fn test_theta_is_negative_for_atm() {
        let theta = theta_per_day(100.0, 100.0, 30.0 / 365.0, 0.05, 0.0, 0.3, OptionType::Put)
            .unwrap();
        assert!(theta < 0.0);
        // Roughly -0.06 per day for a 30-day ATM option at 30% vol.
        assert!(theta > -0.2);
    }

    #[test]
    fn test_zero_volatility_is_numerical_error() {
        let Err(err) = price(100.0, 100.0, 1.0, 0.05, 0.0, 0.0, OptionType::Call) else {
            panic!("sigma = 0 is outside the model's domain");
        };
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_negative_time_is_numerical_error() {
        assert!(price(100.0, 100.0, -0.01, 0.05, 0.0, 0.2, OptionType::Put).is_err());
    }
}
