//! Technical signal sources feeding the candidate generator.
//!
//! Each source is independent and pure; missing history is reported as
//! `DataUnavailable` (volatility) or an empty result (levels, patterns) and
//! never aborts a recommendation.

pub mod levels;
pub mod patterns;
pub mod volatility;

pub use levels::{LevelKind, SupportResistance, TechnicalLevel, detect};
pub use patterns::{PatternKind, PatternMatch, PatternRecognizer};
pub use volatility::{average_true_range, true_range};
