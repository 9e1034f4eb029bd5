//! In-memory market data for tests and offline runs.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::application::ports::{ContractQuery, MarketDataPort};
use crate::domain::market_data::{Granularity, OptionContract, PriceSeries};
use crate::error::EngineError;

/// In-memory implementation of `MarketDataPort`.
#[derive(Debug, Default)]
pub struct InMemoryMarketData {
    series: RwLock<HashMap<(String, Granularity), PriceSeries>>,
    contracts: RwLock<Vec<(ContractQuery, OptionContract)>>,
}

impl InMemoryMarketData {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register price history for a ticker (replaces any existing series at
    /// the same granularity).
    pub fn add_series(&self, ticker: &str, series: PriceSeries) {
        let mut map = self.series.write().unwrap_or_else(PoisonError::into_inner);
        map.insert((ticker.to_ascii_uppercase(), series.granularity()), series);
    }

    /// Register a contract.
    pub fn add_contract(&self, query: ContractQuery, contract: OptionContract) {
        let mut contracts = self.contracts.write().unwrap_or_else(PoisonError::into_inner);
        contracts.retain(|(q, _)| !q.matches(&query));
        contracts.push((query, contract));
    }

    /// Number of registered contracts.
    #[must_use]
    pub fn contract_count(&self) -> usize {
        self.contracts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl MarketDataPort for InMemoryMarketData {
    async fn fetch_price_history(
        &self,
        ticker: &str,
        granularity: Granularity,
        lookback: usize,
    ) -> Result<PriceSeries, EngineError> {
        let map = self.series.read().unwrap_or_else(PoisonError::into_inner);
        let Some(series) = map.get(&(ticker.to_ascii_uppercase(), granularity)) else {
            return Err(EngineError::data_unavailable(
                format!("{ticker} {granularity} history"),
                lookback,
                0,
            ));
        };
        if lookback == 0 || series.len() <= lookback {
            return Ok(series.clone());
        }
        let tail = &series.candles()[series.len() - lookback..];
        PriceSeries::new(granularity, tail.to_vec())
    }

    async fn fetch_option_contract(&self, query: &ContractQuery) -> Result<OptionContract, EngineError> {
        let contracts = self.contracts.read().unwrap_or_else(PoisonError::into_inner);
        contracts
            .iter()
            .find(|(q, _)| q.matches(query))
            .map(|(_, c)| c.clone())
            .ok_or_else(|| query.not_found())
    }
}
