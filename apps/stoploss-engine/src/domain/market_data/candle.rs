//! OHLCV candles and chronological price series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::stop_loss::TradeHorizon;
use crate::error::EngineError;

/// A candle (OHLCV bar).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Bar open time.
    pub timestamp: DateTime<Utc>,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
    /// Volume.
    pub volume: f64,
}

impl Candle {
    /// Create a new candle.
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Lower edge of the candle body.
    #[must_use]
    pub fn body_low(&self) -> f64 {
        self.open.min(self.close)
    }

    /// Upper edge of the candle body.
    #[must_use]
    pub fn body_high(&self) -> f64 {
        self.open.max(self.close)
    }

    /// Close above open.
    #[must_use]
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Close below open.
    #[must_use]
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// True range against the previous close (or high - low without one).
    #[must_use]
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        let range = self.high - self.low;
        match prev_close {
            Some(pc) => range.max((self.high - pc).abs()).max((self.low - pc).abs()),
            None => range,
        }
    }

    fn validate(&self, index: usize) -> Result<(), EngineError> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(EngineError::invalid_input(
                format!("candles[{index}]"),
                "prices must be finite and positive",
            ));
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(EngineError::invalid_input(
                format!("candles[{index}]"),
                "volume must be finite and non-negative",
            ));
        }
        if self.high < self.low || self.high < self.body_high() || self.low > self.body_low() {
            return Err(EngineError::invalid_input(
                format!("candles[{index}]"),
                "high/low must bound open and close",
            ));
        }
        Ok(())
    }
}

/// Bar size of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Granularity {
    /// Sub-daily bars (e.g. 5-minute).
    Intraday,
    /// Daily bars.
    Daily,
    /// Weekly bars.
    Weekly,
}

impl Granularity {
    /// Horizon whose patterns this granularity describes.
    #[must_use]
    pub const fn native_horizon(&self) -> TradeHorizon {
        match self {
            Self::Intraday => TradeHorizon::Scalp,
            Self::Daily => TradeHorizon::Swing,
            Self::Weekly => TradeHorizon::LongTerm,
        }
    }

    /// Granularity used to analyse a horizon.
    #[must_use]
    pub const fn for_horizon(horizon: TradeHorizon) -> Self {
        match horizon {
            TradeHorizon::Scalp => Self::Intraday,
            TradeHorizon::Swing => Self::Daily,
            TradeHorizon::LongTerm => Self::Weekly,
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intraday => write!(f, "INTRADAY"),
            Self::Daily => write!(f, "DAILY"),
            Self::Weekly => write!(f, "WEEKLY"),
        }
    }
}

#[derive(Deserialize)]
struct RawPriceSeries {
    granularity: Granularity,
    candles: Vec<Candle>,
}

/// Chronological candles at a single granularity.
///
/// Timestamps are strictly increasing; gaps are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceSeries")]
pub struct PriceSeries {
    granularity: Granularity,
    candles: Vec<Candle>,
}

impl TryFrom<RawPriceSeries> for PriceSeries {
    type Error = EngineError;

    fn try_from(raw: RawPriceSeries) -> Result<Self, Self::Error> {
        Self::new(raw.granularity, raw.candles)
    }
}

impl PriceSeries {
    /// Build a validated series.
    ///
    /// # Errors
    /// Returns `InvalidInput` for an empty series, malformed candles or
    /// non-increasing timestamps.
    pub fn new(granularity: Granularity, candles: Vec<Candle>) -> Result<Self, EngineError> {
        if candles.is_empty() {
            return Err(EngineError::invalid_input(
                "candles",
                "price series must not be empty",
            ));
        }
        for (i, candle) in candles.iter().enumerate() {
            candle.validate(i)?;
        }
        if let Some(i) = candles
            .windows(2)
            .position(|w| w[1].timestamp <= w[0].timestamp)
        {
            return Err(EngineError::invalid_input(
                format!("candles[{}]", i + 1),
                "timestamps must be strictly increasing",
            ));
        }
        Ok(Self {
            granularity,
            candles,
        })
    }

    /// Bar size.
    #[must_use]
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// All candles, oldest first.
    #[must_use]
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// Number of candles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Most recent candle.
    #[must_use]
    pub fn last(&self) -> &Candle {
        // Non-empty by construction.
        &self.candles[self.candles.len() - 1]
    }

    /// Close of the most recent candle.
    #[must_use]
    pub fn last_close(&self) -> f64 {
        self.last().close
    }

    /// Timestamp of the most recent candle.
    #[must_use]
    pub fn as_of(&self) -> DateTime<Utc> {
        self.last().timestamp
    }
}
