//! Trade-horizon classification from days to expiration.

use serde::{Deserialize, Serialize};

/// Holding horizon implied by an option's days to expiration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeHorizon {
    /// DTE <= 2.
    Scalp,
    /// 2 < DTE <= 90.
    Swing,
    /// DTE > 90.
    #[serde(rename = "longterm")]
    LongTerm,
}

impl TradeHorizon {
    /// All horizons, shortest first.
    pub const ALL: [Self; 3] = [Self::Scalp, Self::Swing, Self::LongTerm];

    /// Horizon used as `primary` when DTE is unknown.
    pub const DEFAULT: Self = Self::Swing;

    /// Classify a known DTE.
    #[must_use]
    pub const fn from_dte(dte: u32) -> Self {
        match dte {
            0..=2 => Self::Scalp,
            3..=90 => Self::Swing,
            _ => Self::LongTerm,
        }
    }

    /// Lowercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scalp => "scalp",
            Self::Swing => "swing",
            Self::LongTerm => "longterm",
        }
    }
}

impl std::fmt::Display for TradeHorizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification result: a single horizon, or unknown when DTE is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestedHorizon {
    /// DTE known.
    Known(TradeHorizon),
    /// DTE unknown: every horizon is evaluated.
    Unknown,
}

impl RequestedHorizon {
    /// Classify an optional DTE.
    #[must_use]
    pub const fn classify(dte: Option<u32>) -> Self {
        match dte {
            Some(days) => Self::Known(TradeHorizon::from_dte(days)),
            None => Self::Unknown,
        }
    }

    /// Horizons that need a result.
    #[must_use]
    pub fn horizons(&self) -> Vec<TradeHorizon> {
        match self {
            Self::Known(h) => vec![*h],
            Self::Unknown => TradeHorizon::ALL.to_vec(),
        }
    }

    /// Horizon whose result is designated `primary`.
    #[must_use]
    pub const fn primary(&self) -> TradeHorizon {
        match self {
            Self::Known(h) => *h,
            Self::Unknown => TradeHorizon::DEFAULT,
        }
    }
}

impl std::fmt::Display for RequestedHorizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known(h) => write!(f, "{h}"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, TradeHorizon::Scalp ; "same day")]
    #[test_case(2, TradeHorizon::Scalp ; "two days")]
    #[test_case(3, TradeHorizon::Swing ; "three days")]
    #[test_case(90, TradeHorizon::Swing ; "ninety days")]
    #[test_case(91, TradeHorizon::LongTerm ; "ninety one days")]
    #[test_case(400, TradeHorizon::LongTerm ; "leaps")]
    fn test_from_dte(dte: u32, expected: TradeHorizon) {
        assert_eq!(TradeHorizon::from_dte(dte), expected);
    }

    #[test]
    fn test_unknown_requests_all_horizons() {
        let requested = RequestedHorizon::classify(None);
        assert_eq!(requested, RequestedHorizon::Unknown);
        assert_eq!(requested.horizons(), TradeHorizon::ALL.to_vec());
        assert_eq!(requested.primary(), TradeHorizon::Swing);
    }

    #[test]
    fn test_known_requests_single_horizon() {
        let requested = RequestedHorizon::classify(Some(1));
        assert_eq!(requested.horizons(), vec![TradeHorizon::Scalp]);
        assert_eq!(requested.primary(), TradeHorizon::Scalp);
    }

    #[test]
    fn test_serde_labels() {
        let json = match serde_json::to_string(&TradeHorizon::LongTerm) {
            Ok(j) => j,
            Err(e) => panic!("serialize: {e}"),
        };
        assert_eq!(json, "\"longterm\"");
    }
}
