//! JSON snapshot adapter.
//!
//! A snapshot bundles one contract query, its contract and the underlying's
//! price history:
//!
//! ```json
//! {
//!   "query": { "ticker": "SPY", "strike": 496.0, "option_type": "PUT", "expiration": "2026-03-20" },
//!   "contract": { "underlying_price": 496.48, "strike": 496.0, "option_type": "PUT", "current_option_price": 3.5 },
//!   "price_history": [ { "granularity": "DAILY", "candles": [ ... ] } ]
//! }
//! ```

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::{ContractQuery, MarketDataPort};
use crate::domain::market_data::{Granularity, OptionContract, PriceSeries};
use crate::error::EngineError;

use super::in_memory::InMemoryMarketData;

/// Snapshot loading errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Failed to read the snapshot file.
    #[error("Failed to read snapshot '{path}': {source}")]
    ReadError {
        /// Path to the snapshot.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse the snapshot JSON (including invalid series).
    #[error("Failed to parse snapshot JSON: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Serialized snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Contract the snapshot was taken for.
    pub query: ContractQuery,
    /// Contract data.
    pub contract: OptionContract,
    /// Underlying history, one series per granularity.
    pub price_history: Vec<PriceSeries>,
}

/// `MarketDataPort` backed by a snapshot.
#[derive(Debug)]
pub struct SnapshotMarketData {
    query: ContractQuery,
    store: InMemoryMarketData,
}

impl SnapshotMarketData {
    /// Build from a parsed snapshot.
    #[must_use]
    pub fn new(snapshot: MarketSnapshot) -> Self {
        let store = InMemoryMarketData::new();
        for series in snapshot.price_history {
            store.add_series(&snapshot.query.ticker, series);
        }
        store.add_contract(snapshot.query.clone(), snapshot.contract);
        Self {
            query: snapshot.query,
            store,
        }
    }

    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: MarketSnapshot = serde_json::from_str(json)?;
        Ok(Self::new(snapshot))
    }

    /// Load a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| SnapshotError::ReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&contents)
    }

    /// The snapshot's contract query.
    #[must_use]
    pub const fn query(&self) -> &ContractQuery {
        &self.query
    }
}

#[async_trait]
impl MarketDataPort for SnapshotMarketData {
    async fn fetch_price_history(
        &self,
        ticker: &str,
        granularity: Granularity,
        lookback: usize,
    ) -> Result<PriceSeries, EngineError> {
        self.store
            .fetch_price_history(ticker, granularity, lookback)
            .await
    }

    async fn fetch_option_contract(&self, query: &ContractQuery) -> Result<OptionContract, EngineError> {
        self.store.fetch_option_contract(query).await
    }
}
