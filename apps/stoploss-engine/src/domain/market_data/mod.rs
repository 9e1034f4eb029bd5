//! Market data value objects consumed by the engine.

mod candle;
mod option_contract;

pub use candle::{Candle, Granularity, PriceSeries};
pub use option_contract::{OptionContract, OptionType};
