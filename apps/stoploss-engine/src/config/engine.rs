//! Signal and candidate-generation settings.

use serde::{Deserialize, Serialize};

use crate::domain::stop_loss::TradeHorizon;

/// Per-horizon candidate settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonSettings {
    /// ATR smoothing length (volatility smoothing).
    pub atr_window: usize,
    /// ATR multiple placed beyond a support/resistance level.
    pub support_resistance_atr_multiple: f64,
    /// ATR multiple from the current price when no level exists.
    pub volatility_atr_multiple: f64,
    /// Fixed distance from the current price when ATR is unavailable.
    pub fixed_fallback_pct: f64,
}

/// Horizon settings for all three horizons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonTable {
    /// Settings for 0-2 DTE.
    #[serde(default = "default_scalp")]
    pub scalp: HorizonSettings,
    /// Settings for 3-90 DTE.
    #[serde(default = "default_swing")]
    pub swing: HorizonSettings,
    /// Settings for more than 90 DTE.
    #[serde(default = "default_longterm")]
    pub longterm: HorizonSettings,
}

impl HorizonTable {
    /// Settings for a horizon.
    #[must_use]
    pub const fn get(&self, horizon: TradeHorizon) -> &HorizonSettings {
        match horizon {
            TradeHorizon::Scalp => &self.scalp,
            TradeHorizon::Swing => &self.swing,
            TradeHorizon::LongTerm => &self.longterm,
        }
    }
}

impl Default for HorizonTable {
    fn default() -> Self {
        Self {
            scalp: default_scalp(),
            swing: default_swing(),
            longterm: default_longterm(),
        }
    }
}

/// Engine configuration: lookbacks, pattern strictness and buffers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Symmetric window for local extrema (support/resistance).
    #[serde(default = "default_support_resistance_order")]
    pub support_resistance_order: usize,
    /// Candles before the current one that define the breakout range.
    #[serde(default = "default_pattern_lookback")]
    pub pattern_lookback: usize,
    /// Candles averaged for volume confirmation.
    #[serde(default = "default_volume_lookback")]
    pub volume_lookback: usize,
    /// Pattern strictness: current volume must be at least this multiple of the average.
    #[serde(default = "default_volume_confirmation_threshold")]
    pub volume_confirmation_threshold: f64,
    /// Maximum distance of a pattern from a key level (fraction of the level).
    #[serde(default = "default_key_level_tolerance")]
    pub key_level_tolerance: f64,
    /// ATR fraction beyond the key level for breakout/breakdown stops.
    #[serde(default = "default_breakout_atr_buffer")]
    pub breakout_atr_buffer: f64,
    /// ATR fraction beyond the key level for engulfing stops.
    #[serde(default = "default_engulfing_atr_buffer")]
    pub engulfing_atr_buffer: f64,
    /// Distance of the synthesized default when every signal fails.
    #[serde(default = "default_conservative_default_pct")]
    pub conservative_default_pct: f64,
    /// Per-horizon settings.
    #[serde(default)]
    pub horizons: HorizonTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            support_resistance_order: default_support_resistance_order(),
            pattern_lookback: default_pattern_lookback(),
            volume_lookback: default_volume_lookback(),
            volume_confirmation_threshold: default_volume_confirmation_threshold(),
            key_level_tolerance: default_key_level_tolerance(),
            breakout_atr_buffer: default_breakout_atr_buffer(),
            engulfing_atr_buffer: default_engulfing_atr_buffer(),
            conservative_default_pct: default_conservative_default_pct(),
            horizons: HorizonTable::default(),
        }
    }
}

const fn default_support_resistance_order() -> usize {
    10
}

const fn default_pattern_lookback() -> usize {
    10
}

const fn default_volume_lookback() -> usize {
    10
}

const fn default_volume_confirmation_threshold() -> f64 {
    1.5
}

const fn default_key_level_tolerance() -> f64 {
    0.02
}

const fn default_breakout_atr_buffer() -> f64 {
    0.10
}

const fn default_engulfing_atr_buffer() -> f64 {
    0.05
}

const fn default_conservative_default_pct() -> f64 {
    0.05
}

const fn default_scalp() -> HorizonSettings {
    HorizonSettings {
        atr_window: 7,
        support_resistance_atr_multiple: 0.25,
        volatility_atr_multiple: 1.0,
        fixed_fallback_pct: 0.02,
    }
}

const fn default_swing() -> HorizonSettings {
    HorizonSettings {
        atr_window: 14,
        support_resistance_atr_multiple: 0.5,
        volatility_atr_multiple: 1.5,
        fixed_fallback_pct: 0.05,
    }
}

const fn default_longterm() -> HorizonSettings {
    HorizonSettings {
        atr_window: 21,
        support_resistance_atr_multiple: 0.75,
        volatility_atr_multiple: 2.0,
        fixed_fallback_pct: 0.15,
    }
}
