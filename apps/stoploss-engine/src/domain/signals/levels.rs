//! Support and resistance from symmetric-window local extrema.
//!
//! A candle is a support if its low is strictly below every low within
//! `order` candles on both sides, and a resistance if its high is strictly
//! above every such high. Supports are ordered by price descending,
//! resistances ascending; `levels[0]` is the one consumers treat as most
//! relevant.

use serde::{Deserialize, Serialize};

use crate::domain::market_data::PriceSeries;

/// Kind of technical level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    /// Local minimum acting as a floor.
    Support,
    /// Local maximum acting as a ceiling.
    Resistance,
}

/// A derived support or resistance level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechnicalLevel {
    /// Level price.
    pub price: f64,
    /// Support or resistance.
    pub kind: LevelKind,
    /// 0 for the most recent extremum of its kind, increasing with age.
    pub recency_rank: usize,
}

/// Supports and resistances found in a series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    /// Supports, price descending.
    pub supports: Vec<TechnicalLevel>,
    /// Resistances, price ascending.
    pub resistances: Vec<TechnicalLevel>,
}

impl SupportResistance {
    /// True when no level of either kind was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.supports.is_empty() && self.resistances.is_empty()
    }

    /// Levels of one kind in consumer order.
    #[must_use]
    pub fn of_kind(&self, kind: LevelKind) -> &[TechnicalLevel] {
        match kind {
            LevelKind::Support => &self.supports,
            LevelKind::Resistance => &self.resistances,
        }
    }

    /// Highest support strictly below `price`.
    #[must_use]
    pub fn support_below(&self, price: f64) -> Option<&TechnicalLevel> {
        self.supports.iter().find(|l| l.price < price)
    }

    /// Lowest resistance strictly above `price`.
    #[must_use]
    pub fn resistance_above(&self, price: f64) -> Option<&TechnicalLevel> {
        self.resistances.iter().find(|l| l.price > price)
    }

    /// Closest level of `kind` within `tolerance` (fraction of the level) of `price`.
    #[must_use]
    pub fn near(&self, price: f64, kind: LevelKind, tolerance: f64) -> Option<&TechnicalLevel> {
        self.of_kind(kind)
            .iter()
            .filter(|l| ((price - l.price) / l.price).abs() <= tolerance)
            .min_by(|a, b| (price - a.price).abs().total_cmp(&(price - b.price).abs()))
    }
}

/// Detect local extrema with a symmetric window of `order` candles.
///
/// Returns an empty set when the series has fewer than `2 * order + 1` candles.
#[must_use]
pub fn detect(series: &PriceSeries, order: usize) -> SupportResistance {
    let candles = series.candles();
    let n = candles.len();
    if order == 0 || n < 2 * order + 1 {
        return SupportResistance::default();
    }

    let mut minima = Vec::new();
    let mut maxima = Vec::new();
    for i in order..n - order {
        let window = (i - order..=i + order).filter(|&j| j != i);
        let (low, high) = (candles[i].low, candles[i].high);
        if window.clone().all(|j| low < candles[j].low) {
            minima.push(i);
        }
        if window.clone().all(|j| high > candles[j].high) {
            maxima.push(i);
        }
    }

    let mut supports = ranked(&minima, |i| candles[i].low, LevelKind::Support);
    let mut resistances = ranked(&maxima, |i| candles[i].high, LevelKind::Resistance);
    supports.sort_by(|a, b| b.price.total_cmp(&a.price));
    resistances.sort_by(|a, b| a.price.total_cmp(&b.price));

    SupportResistance {
        supports,
        resistances,
    }
}

fn ranked(indices: &[usize], price: impl Fn(usize) -> f64, kind: LevelKind) -> Vec<TechnicalLevel> {
    indices
        .iter()
        .rev()
        .enumerate()
        .map(|(rank, &i)| TechnicalLevel {
            price: price(i),
            kind,
            recency_rank: rank,
        })
        .collect()
}
