//! Terminal recommendation types.
//!
//! A `StopLossResult` is only ever built whole, and a `RecommendationSet`
//! cannot exist without its primary entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pricing::{PricingMethod, ThetaProjection};
use crate::recommendation::display::{DisplaySection, RiskWarning};

use super::candidates::BasisKind;
use super::horizon::{RequestedHorizon, TradeHorizon};

/// Stop-loss recommendation for one horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopLossResult {
    /// Horizon this result applies to.
    pub horizon: TradeHorizon,
    /// Recommended underlying stop price.
    pub level: f64,
    /// Which signal won, or the policy cap that replaced it.
    pub basis: String,
    /// Source of the winning candidate.
    pub basis_kind: BasisKind,
    /// Winning candidate level before cap enforcement.
    pub technical_level: f64,
    /// Distance from the current price, percent.
    pub percentage_from_current: f64,
    /// The buffer policy replaced the technical level.
    pub buffer_capped: bool,
    /// Buffer cap in force, percent of the current price.
    pub max_buffer_percent: f64,
    /// Estimated option premium at the stop.
    pub option_price_at_stop: f64,
    /// Premium loss at the stop, percent of the current premium.
    pub option_loss_percent: f64,
    /// How `option_price_at_stop` was estimated.
    pub pricing_method: PricingMethod,
    /// Theta decay from the current premium, when theta is known.
    pub theta_projection: Option<ThetaProjection>,
}

/// Results per horizon plus a designated primary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationSet {
    requested: RequestedHorizon,
    primary: StopLossResult,
    results: BTreeMap<TradeHorizon, StopLossResult>,
    warnings: Vec<RiskWarning>,
    sections: Vec<DisplaySection>,
}

impl RecommendationSet {
    /// Assemble a set; `primary` is always part of `results`.
    pub(crate) fn new(
        requested: RequestedHorizon,
        primary: StopLossResult,
        others: impl IntoIterator<Item = StopLossResult>,
        warnings: Vec<RiskWarning>,
        sections: Vec<DisplaySection>,
    ) -> Self {
        let mut results: BTreeMap<_, _> = others.into_iter().map(|r| (r.horizon, r)).collect();
        results.insert(primary.horizon, primary.clone());
        Self {
            requested,
            primary,
            results,
            warnings,
            sections,
        }
    }

    /// Classified horizon of the request.
    #[must_use]
    pub const fn requested(&self) -> RequestedHorizon {
        self.requested
    }

    /// Primary result: the matching horizon, or swing when DTE is unknown.
    #[must_use]
    pub const fn primary(&self) -> &StopLossResult {
        &self.primary
    }

    /// Result for a horizon, if evaluated.
    #[must_use]
    pub fn get(&self, horizon: TradeHorizon) -> Option<&StopLossResult> {
        self.results.get(&horizon)
    }

    /// Evaluated horizons, shortest first.
    #[must_use]
    pub fn horizons(&self) -> Vec<TradeHorizon> {
        self.results.keys().copied().collect()
    }

    /// All results, shortest horizon first.
    pub fn iter(&self) -> impl Iterator<Item = &StopLossResult> {
        self.results.values()
    }

    /// Number of horizons evaluated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Always false: the primary entry is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Risk warnings raised while assembling.
    #[must_use]
    pub fn warnings(&self) -> &[RiskWarning] {
        &self.warnings
    }

    /// Ordered display sections.
    #[must_use]
    pub fn sections(&self) -> &[DisplaySection] {
        &self.sections
    }
}
