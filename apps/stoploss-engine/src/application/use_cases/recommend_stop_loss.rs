//! Recommend Stop-Loss Use Case
//!
//! Fetch the contract, fetch history at the granularity matching its
//! horizon, run the engine.

use std::sync::Arc;

use crate::application::ports::{ContractQuery, MarketDataPort};
use crate::config::EngineConfig;
use crate::domain::market_data::Granularity;
use crate::domain::stop_loss::{RecommendationSet, RequestedHorizon};
use crate::error::EngineError;
use crate::recommendation::StopLossEngine;

/// Default candles requested from the provider.
pub const DEFAULT_LOOKBACK: usize = 120;

/// Use case for computing a stop-loss recommendation from a contract query.
pub struct RecommendStopLossUseCase<M>
where
    M: MarketDataPort,
{
    market_data: Arc<M>,
    engine: Arc<StopLossEngine>,
    lookback: usize,
}

impl<M> RecommendStopLossUseCase<M>
where
    M: MarketDataPort,
{
    /// Create a new RecommendStopLossUseCase.
    pub fn new(market_data: Arc<M>, engine: Arc<StopLossEngine>) -> Self {
        Self {
            market_data,
            engine,
            lookback: DEFAULT_LOOKBACK,
        }
    }

    /// Override the requested history length.
    #[must_use]
    pub const fn with_lookback(mut self, lookback: usize) -> Self {
        self.lookback = lookback;
        self
    }

    /// Candles requested: the configured lookback, or what the signals need
    /// if that is more.
    #[must_use]
    pub fn history_length(&self) -> usize {
        self.lookback.max(required_history(&self.engine.config().engine))
    }

    /// Execute the use case.
    ///
    /// # Errors
    /// `ContractNotFound` and `DataUnavailable` from the provider, and
    /// `InvalidInput` for a malformed contract, are returned unchanged.
    #[tracing::instrument(skip_all, fields(ticker = %query.ticker, strike = query.strike, option_type = %query.option_type))]
    pub async fn execute(&self, query: &ContractQuery) -> Result<RecommendationSet, EngineError> {
        let mut contract = self.market_data.fetch_option_contract(query).await?;
        if contract.underlying.is_empty() {
            contract.underlying.clone_from(&query.ticker);
        }

        let granularity = match RequestedHorizon::classify(contract.days_to_expiration) {
            RequestedHorizon::Known(horizon) => Granularity::for_horizon(horizon),
            RequestedHorizon::Unknown => Granularity::Daily,
        };
        let lookback = self.history_length();
        tracing::debug!(%granularity, lookback, "Fetching price history");

        let series = self
            .market_data
            .fetch_price_history(&query.ticker, granularity, lookback)
            .await?;

        self.engine.recommend(&series, &contract)
    }
}

/// Candles needed for every signal source to be evaluable.
#[must_use]
pub fn required_history(config: &EngineConfig) -> usize {
    let atr = [
        config.horizons.scalp.atr_window,
        config.horizons.swing.atr_window,
        config.horizons.longterm.atr_window,
    ];
    atr.into_iter()
        .chain([
            2 * config.support_resistance_order + 1,
            config.pattern_lookback + 1,
            config.volume_lookback + 1,
        ])
        .max()
        .unwrap_or(DEFAULT_LOOKBACK)
}
