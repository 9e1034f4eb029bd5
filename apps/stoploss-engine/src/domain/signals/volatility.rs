//! Average True Range over a trailing window.
//!
//! True Range: max(high - low, |high - prev_close|, |low - prev_close|).
//! ATR here is the simple mean of the last `window` true ranges; the oldest
//! candle in a minimal series has no previous close and contributes high - low.

use crate::domain::market_data::{Candle, PriceSeries};
use crate::error::EngineError;

/// True range for every candle, oldest first.
#[must_use]
pub fn true_range(candles: &[Candle]) -> Vec<f64> {
    candles
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let prev_close = i.checked_sub(1).map(|p| candles[p].close);
            c.true_range(prev_close)
        })
        .collect()
}

/// Mean true range of the last `window` candles.
///
/// # Errors
/// Returns `DataUnavailable` when the series holds fewer than `window`
/// candles (or `window` is zero). Callers treat this as "no volatility
/// candidate", not as a failure.
pub fn average_true_range(series: &PriceSeries, window: usize) -> Result<f64, EngineError> {
    let candles = series.candles();
    if window == 0 || candles.len() < window {
        return Err(EngineError::data_unavailable(
            format!("atr_{window}"),
            window,
            candles.len(),
        ));
    }

    let tr = true_range(candles);
    let tail = &tr[tr.len() - window..];
    Ok(tail.iter().sum::<f64>() / window as f64)
}
