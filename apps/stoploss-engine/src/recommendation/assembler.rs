//! Builds the fully-populated `RecommendationSet`.

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::domain::market_data::{OptionContract, PriceSeries};
use crate::domain::stop_loss::{
    BufferPolicy, CandidateGenerator, MarketSignals, PrecedenceResolver, RecommendationSet,
    RequestedHorizon, StopLossResult, TradeHorizon,
};
use crate::pricing::{OptionPriceProjector, ThetaProjector};

use super::display::{build_sections, risk_warnings};

/// Composes candidates, precedence, pricing and projection per horizon.
#[derive(Debug, Clone)]
pub struct RecommendationAssembler {
    generator: CandidateGenerator,
    resolver: PrecedenceResolver,
    projector: OptionPriceProjector,
    theta: ThetaProjector,
}

impl Default for RecommendationAssembler {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl RecommendationAssembler {
    /// Build from configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            generator: CandidateGenerator::new(config.engine.clone()),
            resolver: PrecedenceResolver::new(
                BufferPolicy::new(&config.buffer_policy),
                config.engine.conservative_default_pct,
            ),
            projector: OptionPriceProjector::new(config.pricing.clone()),
            theta: ThetaProjector::new(config.projection.clone(), config.pricing.min_tick),
        }
    }

    /// Option price projector in use.
    #[must_use]
    pub const fn projector(&self) -> &OptionPriceProjector {
        &self.projector
    }

    /// Assemble results for every applicable horizon.
    #[must_use]
    pub fn assemble(
        &self,
        series: &PriceSeries,
        contract: &OptionContract,
        signals: &MarketSignals,
    ) -> RecommendationSet {
        let requested = RequestedHorizon::classify(contract.days_to_expiration);
        let primary_horizon = requested.primary();

        let results: Vec<StopLossResult> = requested
            .horizons()
            .into_iter()
            .map(|h| self.result_for(series, contract, signals, h, series.as_of()))
            .collect();

        let primary = results
            .iter()
            .find(|r| r.horizon == primary_horizon)
            .cloned()
            .unwrap_or_else(|| {
                // Primary horizon is always among the requested ones.
                self.result_for(series, contract, signals, primary_horizon, series.as_of())
            });

        let near_expiry_atm = self.projector.requires_full_model(
            contract,
            contract
                .days_to_expiration
                .unwrap_or_else(|| BufferPolicy::representative_dte(primary_horizon)),
        );

        let ordered: Vec<&StopLossResult> = results.iter().collect();
        let warnings = risk_warnings(near_expiry_atm, contract, &results);
        let sections = build_sections(contract, requested, &primary, &ordered, &warnings);

        tracing::info!(
            %requested,
            horizon = %primary.horizon,
            level = primary.level,
            basis = %primary.basis_kind,
            capped = primary.buffer_capped,
            pricing = %primary.pricing_method,
            "Stop-loss recommendation assembled"
        );

        RecommendationSet::new(requested, primary, results, warnings, sections)
    }

    fn result_for(
        &self,
        series: &PriceSeries,
        contract: &OptionContract,
        signals: &MarketSignals,
        horizon: TradeHorizon,
        as_of: DateTime<Utc>,
    ) -> StopLossResult {
        let current = contract.underlying_price;
        let candidates = self.generator.generate(
            series,
            signals,
            contract.option_type,
            horizon,
            current,
        );
        let resolution = self.resolver.resolve(
            &candidates,
            contract.option_type,
            contract.days_to_expiration,
            horizon,
            current,
        );

        // Unknown DTE prices each horizon at its representative DTE.
        let pricing_dte = contract
            .days_to_expiration
            .unwrap_or(resolution.cap_dte);
        let estimate = self.projector.price_at(contract, resolution.level, pricing_dte);
        let option_loss_percent = if contract.current_option_price > 0.0 {
            (contract.current_option_price - estimate.price) / contract.current_option_price * 100.0
        } else {
            0.0
        };

        let theta_projection = self
            .projector
            .theta_per_day(contract, pricing_dte)
            .map(|theta| {
                self.theta.project(
                    contract.current_option_price,
                    theta,
                    horizon,
                    contract.days_to_expiration,
                    as_of,
                )
            });

        tracing::debug!(
            %horizon,
            level = resolution.level,
            basis = %resolution.selected.basis,
            capped = resolution.buffer_capped,
            method = %estimate.method,
            "Horizon resolved"
        );

        StopLossResult {
            horizon,
            level: resolution.level,
            basis: resolution.basis_label(contract.option_type),
            basis_kind: resolution.selected.basis,
            technical_level: resolution.selected.level,
            percentage_from_current: (resolution.level - current).abs() / current * 100.0,
            buffer_capped: resolution.buffer_capped,
            max_buffer_percent: resolution.cap_pct * 100.0,
            option_price_at_stop: estimate.price,
            option_loss_percent,
            pricing_method: estimate.method,
            theta_projection,
        }
    }
}
