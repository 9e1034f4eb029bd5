// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements,
        clippy::cast_possible_wrap
    )
)]

//! Stop-Loss Engine - Rust Core Library
//!
//! Recommends an underlying stop-loss level for a single-leg option position
//! and projects the option's price at that level and over time.
//!
//! # Pipeline
//!
//! price history + contract
//! → signals (ATR, support/resistance, candle patterns)
//! → candidates per horizon (pattern → S/R → volatility → fixed fallback)
//! → precedence + buffer cap
//! → option price at stop (Black-Scholes, delta fallback) + theta decay
//! → `RecommendationSet` (always with a primary entry)
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: market data, signals, stop-loss decision (no I/O)
//! - **Pricing**: Black-Scholes, IV recovery, projections
//! - **Recommendation**: engine entry point, assembler, display sections
//! - **Application**: market data port, recommend use case
//! - **Infrastructure**: in-memory and JSON snapshot adapters
//!
//! # Example
//!
//! ```ignore
//! use stoploss_engine::{OptionContract, OptionType, StopLossEngine};
//!
//! let engine = StopLossEngine::default();
//! let contract = OptionContract::new(100.0, 100.0, OptionType::Call, 2.4).with_dte(14);
//! let set = engine.recommend(&series, &contract)?;
//! println!("{}", set.primary().level);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - stop-loss decision logic with no I/O.
pub mod domain;

/// Option pricing and theta projection.
pub mod pricing;

/// Recommendation pipeline.
pub mod recommendation;

/// Application layer - use cases and port definitions.
pub mod application;

/// Infrastructure layer - adapters.
pub mod infrastructure;

/// Configuration loading.
pub mod config;

/// Error types.
pub mod error;

/// Tracing setup.
pub mod telemetry;

pub use config::{Config, ConfigError, load_config};
pub use domain::market_data::{Candle, Granularity, OptionContract, OptionType, PriceSeries};
pub use domain::stop_loss::{
    BasisKind, RecommendationSet, RequestedHorizon, StopLossResult, TradeHorizon,
};
pub use error::{EngineError, ErrorCode};
pub use pricing::PricingMethod;
pub use recommendation::{RecommendationRequest, StopLossEngine};
