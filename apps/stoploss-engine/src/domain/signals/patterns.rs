//! Candle pattern recognition on the most recent candle.
//!
//! Two families are recognized:
//! - Breakout / breakdown: close beyond the prior `lookback` range while the
//!   open was still inside it.
//! - Engulfing: the current body fully contains the previous (opposite
//!   colored) body and closes in its own direction.
//!
//! A match also needs volume confirmation (current volume at least
//! `volume_threshold` times the mean of the preceding `volume_lookback`
//! candles) and must sit within `key_level_tolerance` of a support or
//! resistance level on the pattern's side. A failed check is "no match".

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::domain::market_data::{Candle, PriceSeries};

use super::levels::{LevelKind, SupportResistance};

/// Recognized pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Close above the prior range high.
    Breakout,
    /// Close below the prior range low.
    Breakdown,
    /// Bullish body engulfing a bearish one.
    EngulfingBullish,
    /// Bearish body engulfing a bullish one.
    EngulfingBearish,
}

impl PatternKind {
    /// Pattern signals upward momentum.
    #[must_use]
    pub const fn is_bullish(&self) -> bool {
        matches!(self, Self::Breakout | Self::EngulfingBullish)
    }

    /// Pattern belongs to the engulfing family.
    #[must_use]
    pub const fn is_engulfing(&self) -> bool {
        matches!(self, Self::EngulfingBullish | Self::EngulfingBearish)
    }

    /// Level kind that validates this pattern.
    ///
    /// A breakout clears a resistance, a breakdown a support; engulfing
    /// reversals form at the floor (bullish) or ceiling (bearish).
    #[must_use]
    pub const fn key_level_kind(&self) -> LevelKind {
        match self {
            Self::Breakout | Self::EngulfingBearish => LevelKind::Resistance,
            Self::Breakdown | Self::EngulfingBullish => LevelKind::Support,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Breakout => "breakout",
            Self::Breakdown => "breakdown",
            Self::EngulfingBullish => "bullish engulfing",
            Self::EngulfingBearish => "bearish engulfing",
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A pattern on the most recent candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    /// Pattern kind.
    pub pattern: PatternKind,
    /// Broken range edge (breakout/breakdown) or engulfing close.
    pub reference_price: f64,
    /// Current volume over the preceding average.
    pub volume_ratio: f64,
    /// Reference price lies near a key level of the pattern's side.
    pub confirmed_at_key_level: bool,
    /// The validating level, when confirmed.
    pub key_level: Option<f64>,
}

/// Candle pattern recognizer.
#[derive(Debug, Clone)]
pub struct PatternRecognizer {
    lookback: usize,
    volume_lookback: usize,
    volume_threshold: f64,
    key_level_tolerance: f64,
}

impl Default for PatternRecognizer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl PatternRecognizer {
    /// Build from engine configuration.
    #[must_use]
    pub const fn from_config(config: &EngineConfig) -> Self {
        Self {
            lookback: config.pattern_lookback,
            volume_lookback: config.volume_lookback,
            volume_threshold: config.volume_confirmation_threshold,
            key_level_tolerance: config.key_level_tolerance,
        }
    }

    /// Candles needed before any pattern can be evaluated.
    #[must_use]
    pub fn min_candles(&self) -> usize {
        self.lookback.max(self.volume_lookback).max(1) + 1
    }

    /// Fully validated pattern on the latest candle, if any.
    #[must_use]
    pub fn recognize(&self, series: &PriceSeries, levels: &SupportResistance) -> Option<PatternMatch> {
        let raw = self.scan(series)?;
        if raw.volume_ratio < self.volume_threshold {
            tracing::debug!(
                pattern = %raw.pattern,
                volume_ratio = raw.volume_ratio,
                "Pattern rejected: volume not confirmed"
            );
            return None;
        }
        let Some(level) = levels.near(
            raw.reference_price,
            raw.pattern.key_level_kind(),
            self.key_level_tolerance,
        ) else {
            tracing::debug!(
                pattern = %raw.pattern,
                reference_price = raw.reference_price,
                "Pattern rejected: no key level nearby"
            );
            return None;
        };
        Some(PatternMatch {
            confirmed_at_key_level: true,
            key_level: Some(level.price),
            ..raw
        })
    }

    /// Shape and volume of the latest candle without key-level validation.
    ///
    /// Breakout/breakdown take precedence over engulfing.
    #[must_use]
    pub fn scan(&self, series: &PriceSeries) -> Option<PatternMatch> {
        let candles = series.candles();
        if candles.len() < self.min_candles() {
            return None;
        }
        let n = candles.len();
        let current = &candles[n - 1];
        let previous = &candles[n - 2];

        let (pattern, reference_price) = Self::range_break(current, &candles[n - 1 - self.lookback..n - 1])
            .or_else(|| Self::engulfing(current, previous))?;

        let prior_volume = &candles[n - 1 - self.volume_lookback..n - 1];
        let mean_volume = prior_volume.iter().map(|c| c.volume).sum::<f64>() / prior_volume.len() as f64;
        // An empty volume window yields NaN, which must not pass as confirmed.
        if !mean_volume.is_finite() || mean_volume <= 0.0 {
            return None;
        }

        Some(PatternMatch {
            pattern,
            reference_price,
            volume_ratio: current.volume / mean_volume,
            confirmed_at_key_level: false,
            key_level: None,
        })
    }

    fn range_break(current: &Candle, window: &[Candle]) -> Option<(PatternKind, f64)> {
        let high = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let opened_inside = current.open >= low && current.open <= high;
        if !opened_inside {
            return None;
        }
        if current.close > high {
            Some((PatternKind::Breakout, high))
        } else if current.close < low {
            Some((PatternKind::Breakdown, low))
        } else {
            None
        }
    }

    fn engulfing(current: &Candle, previous: &Candle) -> Option<(PatternKind, f64)> {
        let contains = current.body_low() <= previous.body_low()
            && current.body_high() >= previous.body_high()
            && (current.body_high() - current.body_low()) > (previous.body_high() - previous.body_low());
        if !contains {
            return None;
        }
        if current.is_bullish() && previous.is_bearish() {
            Some((PatternKind::EngulfingBullish, current.close))
        } else if current.is_bearish() && previous.is_bullish() {
            Some((PatternKind::EngulfingBearish, current.close))
        } else {
            None
        }
    }
}
