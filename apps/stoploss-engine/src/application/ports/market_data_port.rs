//! Market Data Port (Driven Port)
//!
//! Price history and option contracts from an external provider. Fetch
//! failures surface as `DataUnavailable` or `ContractNotFound`; the engine
//! is not invoked when a fetch fails.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::market_data::{Granularity, OptionContract, OptionType, PriceSeries};
use crate::error::EngineError;

/// Identifies a single option contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractQuery {
    /// Underlying ticker (e.g., "SPY").
    pub ticker: String,
    /// Strike price.
    pub strike: f64,
    /// Call or put.
    pub option_type: OptionType,
    /// Expiration date.
    pub expiration: NaiveDate,
}

impl ContractQuery {
    /// Create a query.
    #[must_use]
    pub fn new(
        ticker: impl Into<String>,
        strike: f64,
        option_type: OptionType,
        expiration: NaiveDate,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            strike,
            option_type,
            expiration,
        }
    }

    /// Same ticker, type, expiration and strike (to the cent).
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.ticker.eq_ignore_ascii_case(&other.ticker)
            && self.option_type == other.option_type
            && self.expiration == other.expiration
            && (self.strike - other.strike).abs() < 0.005
    }

    /// `ContractNotFound` for this query.
    #[must_use]
    pub fn not_found(&self) -> EngineError {
        EngineError::ContractNotFound {
            ticker: self.ticker.clone(),
            strike: self.strike,
            option_type: self.option_type.to_string(),
            expiration: self.expiration.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Port for fetching engine inputs.
///
/// This is a driven (secondary/outbound) port. The infrastructure layer
/// provides implementations.
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Most recent `lookback` candles of `ticker` at `granularity`.
    ///
    /// Fails with `DataUnavailable` when the market is closed or the ticker
    /// is unknown.
    async fn fetch_price_history(
        &self,
        ticker: &str,
        granularity: Granularity,
        lookback: usize,
    ) -> Result<PriceSeries, EngineError>;

    /// Contract snapshot for `query`.
    ///
    /// Fails with `ContractNotFound`.
    async fn fetch_option_contract(&self, query: &ContractQuery) -> Result<OptionContract, EngineError>;
}
