//! Theta decay projection over horizon-sized intervals.
//!
//! price(t+1) = max(min_tick, price(t) - |theta| * interval_days)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ProjectionConfig;
use crate::domain::stop_loss::TradeHorizon;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Size of one projection step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayInterval {
    /// One hour (scalp, and every 0-DTE contract).
    Hourly,
    /// One calendar day (swing).
    Daily,
    /// Seven calendar days (longterm).
    Weekly,
}

impl DecayInterval {
    /// Interval for a horizon; 0-DTE always projects hourly.
    #[must_use]
    pub const fn for_horizon(horizon: TradeHorizon, dte: Option<u32>) -> Self {
        if matches!(dte, Some(0)) {
            return Self::Hourly;
        }
        match horizon {
            TradeHorizon::Scalp => Self::Hourly,
            TradeHorizon::Swing => Self::Daily,
            TradeHorizon::LongTerm => Self::Weekly,
        }
    }

    /// Interval length in days.
    #[must_use]
    pub fn days(&self, hours_per_day: f64) -> f64 {
        match self {
            Self::Hourly => 1.0 / hours_per_day,
            Self::Daily => 1.0,
            Self::Weekly => 7.0,
        }
    }
}

impl std::fmt::Display for DecayInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hourly => write!(f, "hourly"),
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
        }
    }
}

/// One projected point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThetaStep {
    /// Time of the projected price.
    pub timestamp: DateTime<Utc>,
    /// Projected premium.
    pub projected_price: f64,
    /// Loss over this interval, percent of the previous price.
    pub interval_loss_percent: f64,
    /// Loss since the start, percent of the starting price.
    pub cumulative_loss_percent: f64,
}

/// Ordered, finite theta decay projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThetaProjection {
    /// Step size.
    pub interval: DecayInterval,
    /// Theta per day used.
    pub theta_per_day: f64,
    /// Starting premium.
    pub starting_price: f64,
    /// Projected points, earliest first.
    pub steps: Vec<ThetaStep>,
}

/// Projects premium decay.
#[derive(Debug, Clone)]
pub struct ThetaProjector {
    config: ProjectionConfig,
    min_tick: f64,
}

impl ThetaProjector {
    /// Create a projector.
    #[must_use]
    pub const fn new(config: ProjectionConfig, min_tick: f64) -> Self {
        Self { config, min_tick }
    }

    /// Number of steps that fit before expiry (at least one).
    ///
    /// A 0-DTE contract still has the current session to decay over.
    #[must_use]
    pub fn step_count(&self, interval: DecayInterval, dte: Option<u32>) -> usize {
        let Some(dte) = dte else {
            return self.config.steps;
        };
        let remaining_days = f64::from(dte.max(1));
        let fits = (remaining_days / interval.days(self.config.hours_per_day)).floor() as usize;
        fits.clamp(1, self.config.steps.max(1))
    }

    /// Project `starting_price` forward from `as_of`.
    #[must_use]
    pub fn project(
        &self,
        starting_price: f64,
        theta_per_day: f64,
        horizon: TradeHorizon,
        dte: Option<u32>,
        as_of: DateTime<Utc>,
    ) -> ThetaProjection {
        let interval = DecayInterval::for_horizon(horizon, dte);
        let interval_days = interval.days(self.config.hours_per_day);
        let decay = theta_per_day.abs() * interval_days;
        let count = self.step_count(interval, dte);

        let mut steps = Vec::with_capacity(count);
        let mut price = starting_price;
        for i in 1..=count {
            let next = (price - decay).max(self.min_tick);
            let offset = Duration::seconds((interval_days * SECONDS_PER_DAY * i as f64).round() as i64);
            steps.push(ThetaStep {
                timestamp: as_of + offset,
                projected_price: next,
                interval_loss_percent: loss_percent(price, next),
                cumulative_loss_percent: loss_percent(starting_price, next),
            });
            price = next;
        }

        ThetaProjection {
            interval,
            theta_per_day,
            starting_price,
            steps,
        }
    }
}

fn loss_percent(from: f64, to: f64) -> f64 {
    if from > 0.0 {
        ((from - to) / from * 100.0).max(0.0)
    } else {
        0.0
    }
}
