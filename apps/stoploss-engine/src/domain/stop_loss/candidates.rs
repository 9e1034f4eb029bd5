//! Candidate generation in precedence order.
//!
//! Tiers, highest precedence first:
//! 1. Pattern: confirmed pattern key level, offset by a fraction of ATR.
//!    Only considered for the horizon the series granularity describes.
//! 2. Support/resistance: nearest level on the stop side, offset by the
//!    horizon's ATR multiple.
//! 3. Volatility: current price offset by the horizon's ATR multiple.
//! 4. Fixed fallback: current price offset by a fixed percentage, only when
//!    ATR is unavailable.
//!
//! Calls stop out below the current price, puts above.

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, HorizonSettings};
use crate::domain::market_data::{OptionType, PriceSeries};
use crate::domain::signals::{
    LevelKind, PatternMatch, PatternRecognizer, SupportResistance, average_true_range,
    detect,
};

use super::horizon::TradeHorizon;

/// Signal source a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasisKind {
    /// Candle pattern at a key level.
    Pattern,
    /// Nearest support or resistance.
    SupportResistance,
    /// ATR multiple from the current price.
    Volatility,
    /// Fixed percentage from the current price.
    FixedFallback,
    /// Synthesized when no upstream candidate was usable.
    ConservativeDefault,
}

impl BasisKind {
    /// True for bases derived from a technical signal.
    #[must_use]
    pub const fn is_technical(&self) -> bool {
        matches!(
            self,
            Self::Pattern | Self::SupportResistance | Self::Volatility
        )
    }
}

impl std::fmt::Display for BasisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pattern => "pattern",
            Self::SupportResistance => "support/resistance",
            Self::Volatility => "volatility",
            Self::FixedFallback => "fixed fallback",
            Self::ConservativeDefault => "conservative default",
        };
        f.write_str(s)
    }
}

/// A proposed stop level for one horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopLossCandidate {
    /// Proposed underlying stop price.
    pub level: f64,
    /// Signal source.
    pub basis: BasisKind,
    /// Horizon the candidate was generated for.
    pub horizon: TradeHorizon,
    /// How the level was derived.
    pub rationale: String,
}

impl StopLossCandidate {
    /// Whether the level sits strictly on the stop side of `current_price`.
    #[must_use]
    pub fn is_valid(&self, option_type: OptionType, current_price: f64) -> bool {
        if !self.level.is_finite() || self.level <= 0.0 {
            return false;
        }
        match option_type {
            OptionType::Call => self.level < current_price,
            OptionType::Put => self.level > current_price,
        }
    }
}

/// Signals shared by every horizon of one request.
#[derive(Debug, Clone)]
pub struct MarketSignals {
    /// Detected supports and resistances.
    pub levels: SupportResistance,
    /// Confirmed pattern on the latest candle.
    pub pattern: Option<PatternMatch>,
    /// Horizon the pattern applies to.
    pub pattern_horizon: TradeHorizon,
}

impl MarketSignals {
    /// Run level detection and pattern recognition once.
    #[must_use]
    pub fn analyze(series: &PriceSeries, config: &EngineConfig) -> Self {
        let levels = detect(series, config.support_resistance_order);
        let pattern = PatternRecognizer::from_config(config).recognize(series, &levels);
        tracing::debug!(
            supports = levels.supports.len(),
            resistances = levels.resistances.len(),
            pattern = ?pattern.map(|p| p.pattern),
            "Signals analyzed"
        );
        Self {
            levels,
            pattern,
            pattern_horizon: series.granularity().native_horizon(),
        }
    }
}

/// Builds the candidate list for a horizon.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    config: EngineConfig,
}

impl Default for CandidateGenerator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl CandidateGenerator {
    /// Create a generator.
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Engine configuration in use.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// All available candidates for `horizon`, highest precedence first.
    ///
    /// The list always ends with a volatility or fixed-fallback candidate.
    #[must_use]
    pub fn generate(
        &self,
        series: &PriceSeries,
        signals: &MarketSignals,
        option_type: OptionType,
        horizon: TradeHorizon,
        current_price: f64,
    ) -> Vec<StopLossCandidate> {
        let settings = self.config.horizons.get(horizon);
        let atr = match average_true_range(series, settings.atr_window) {
            Ok(atr) => Some(atr),
            Err(e) => {
                tracing::debug!(%horizon, error = %e, "No volatility candidate");
                None
            }
        };

        let mut candidates = Vec::with_capacity(3);

        if signals.pattern_horizon == horizon {
            if let Some(c) = self.pattern_candidate(signals.pattern.as_ref(), option_type, horizon, atr)
            {
                candidates.push(c);
            }
        } else if signals.pattern.is_some() {
            tracing::debug!(
                %horizon,
                pattern_horizon = %signals.pattern_horizon,
                "Pattern ignored: horizon mismatch"
            );
        }

        if let Some(c) = Self::level_candidate(&signals.levels, settings, option_type, horizon, current_price, atr) {
            candidates.push(c);
        }

        candidates.push(match atr {
            Some(atr) => Self::volatility_candidate(settings, option_type, horizon, current_price, atr),
            None => Self::fixed_candidate(settings, option_type, horizon, current_price),
        });

        candidates
    }

    fn pattern_candidate(
        &self,
        pattern: Option<&PatternMatch>,
        option_type: OptionType,
        horizon: TradeHorizon,
        atr: Option<f64>,
    ) -> Option<StopLossCandidate> {
        let pattern = pattern?;
        let key_level = pattern.key_level?;
        let aligned = match option_type {
            OptionType::Call => pattern.pattern.is_bullish(),
            OptionType::Put => !pattern.pattern.is_bullish(),
        };
        if !aligned {
            tracing::debug!(%horizon, pattern = %pattern.pattern, %option_type, "Pattern ignored: direction mismatch");
            return None;
        }

        let fraction = if pattern.pattern.is_engulfing() {
            self.config.engulfing_atr_buffer
        } else {
            self.config.breakout_atr_buffer
        };
        let buffer = fraction * atr.unwrap_or(0.0);
        let level = key_level - option_type.sign() * buffer;

        Some(StopLossCandidate {
            level,
            basis: BasisKind::Pattern,
            horizon,
            rationale: format!(
                "{} at key level {key_level:.2} {} {fraction:.2} x ATR",
                pattern.pattern,
                side_symbol(option_type)
            ),
        })
    }

    fn level_candidate(
        levels: &SupportResistance,
        settings: &HorizonSettings,
        option_type: OptionType,
        horizon: TradeHorizon,
        current_price: f64,
        atr: Option<f64>,
    ) -> Option<StopLossCandidate> {
        let (level, kind) = match option_type {
            OptionType::Call => (levels.support_below(current_price), LevelKind::Support),
            OptionType::Put => (levels.resistance_above(current_price), LevelKind::Resistance),
        };
        let Some(level) = level else {
            tracing::debug!(%horizon, ?kind, "No technical level on the stop side");
            return None;
        };

        let multiple = settings.support_resistance_atr_multiple;
        let buffer = multiple * atr.unwrap_or(0.0);
        let label = match kind {
            LevelKind::Support => "support",
            LevelKind::Resistance => "resistance",
        };

        Some(StopLossCandidate {
            level: level.price - option_type.sign() * buffer,
            basis: BasisKind::SupportResistance,
            horizon,
            rationale: format!(
                "{label} {:.2} {} {multiple:.2} x ATR",
                level.price,
                side_symbol(option_type)
            ),
        })
    }

    fn volatility_candidate(
        settings: &HorizonSettings,
        option_type: OptionType,
        horizon: TradeHorizon,
        current_price: f64,
        atr: f64,
    ) -> StopLossCandidate {
        let multiple = settings.volatility_atr_multiple;
        StopLossCandidate {
            level: current_price - option_type.sign() * multiple * atr,
            basis: BasisKind::Volatility,
            horizon,
            rationale: format!(
                "{multiple:.2} x ATR({}) = {:.2} from current price",
                settings.atr_window,
                multiple * atr
            ),
        }
    }

    fn fixed_candidate(
        settings: &HorizonSettings,
        option_type: OptionType,
        horizon: TradeHorizon,
        current_price: f64,
    ) -> StopLossCandidate {
        let pct = settings.fixed_fallback_pct;
        StopLossCandidate {
            level: current_price * (1.0 - option_type.sign() * pct),
            basis: BasisKind::FixedFallback,
            horizon,
            rationale: format!("fixed {:.1}% from current price", pct * 100.0),
        }
    }
}

const fn side_symbol(option_type: OptionType) -> &'static str {
    match option_type {
        OptionType::Call => "-",
        OptionType::Put => "+",
    }
}
