//! Domain layer - stop-loss decision logic with no I/O.
//!
//! - `market_data`: candles, price series, option contracts
//! - `signals`: volatility, support/resistance, candle patterns
//! - `stop_loss`: horizons, buffer policy, candidates, precedence, results

pub mod market_data;
pub mod signals;
pub mod stop_loss;
