//! Engine entry point.
//!
//! `StopLossEngine::recommend` is pure and deterministic given identical
//! inputs. Independent requests share nothing mutable, so
//! `recommend_batch` fans them out over the rayon pool.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::domain::market_data::{OptionContract, PriceSeries};
use crate::domain::stop_loss::{MarketSignals, RecommendationSet};
use crate::error::EngineError;

use super::assembler::RecommendationAssembler;

/// Inputs for one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// Price history of the underlying.
    pub series: PriceSeries,
    /// Option contract.
    pub contract: OptionContract,
}

/// Stop-loss recommendation engine.
#[derive(Debug, Clone)]
pub struct StopLossEngine {
    config: Config,
    assembler: RecommendationAssembler,
}

impl Default for StopLossEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl StopLossEngine {
    /// Create an engine from a validated configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let assembler = RecommendationAssembler::from_config(&config);
        Self { config, assembler }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Compute the stop-loss recommendation for one position.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a malformed contract. Missing signals never
    /// fail a recommendation.
    #[tracing::instrument(
        skip_all,
        fields(
            underlying = %contract.underlying,
            option_type = %contract.option_type,
            dte = ?contract.days_to_expiration,
            candles = series.len(),
        )
    )]
    pub fn recommend(
        &self,
        series: &PriceSeries,
        contract: &OptionContract,
    ) -> Result<RecommendationSet, EngineError> {
        contract.validate()?;
        let signals = MarketSignals::analyze(series, &self.config.engine);
        Ok(self.assembler.assemble(series, contract, &signals))
    }

    /// Compute recommendations for independent requests in parallel.
    ///
    /// Output order matches input order.
    #[tracing::instrument(skip_all, fields(requests = requests.len()))]
    pub fn recommend_batch(
        &self,
        requests: &[RecommendationRequest],
    ) -> Vec<Result<RecommendationSet, EngineError>> {
        requests
            .par_iter()
            .map(|r| self.recommend(&r.series, &r.contract))
            .collect()
    }
}
