//! End-to-end scenarios for the stop-loss engine.
//!
//! Each test drives `StopLossEngine::recommend` (or the projector for the
//! near-expiry case) with a hand-built series and contract.

use chrono::{DateTime, Duration, TimeZone, Utc};
use stoploss_engine::config::Config;
use stoploss_engine::domain::stop_loss::{BufferPolicy, PrecedenceResolver, StopLossCandidate};
use stoploss_engine::pricing::OptionPriceProjector;
use stoploss_engine::recommendation::WarningKind;
use stoploss_engine::{
    BasisKind, Candle, Granularity, OptionContract, OptionType, PriceSeries, PricingMethod,
    RequestedHorizon, StopLossEngine, TradeHorizon,
};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, 13, 30, 0).unwrap()
}

/// 25 five-minute bars around 100 with a single dip to `support` at bar 10.
fn intraday_with_support(support: f64) -> PriceSeries {
    let candles = (0..25)
        .map(|i| {
            let low = if i == 10 { support } else { 99.8 };
            Candle::new(start() + Duration::minutes(5 * i), 100.0, 100.3, low, 100.0, 1_000.0)
        })
        .collect();
    PriceSeries::new(Granularity::Intraday, candles).unwrap()
}

/// Engine whose scalp support candidate is the raw support level.
fn engine_without_scalp_buffer() -> StopLossEngine {
    let mut config = Config::default();
    config.engine.horizons.scalp.support_resistance_atr_multiple = 0.0;
    StopLossEngine::new(config)
}

fn one_dte_call() -> OptionContract {
    OptionContract::new(100.0, 101.0, OptionType::Call, 1.20)
        .with_underlying("XYZ")
        .with_dte(1)
        .with_iv(0.30)
}

#[test]
fn test_within_cap_keeps_support_level() {
    let engine = engine_without_scalp_buffer();
    let set = engine
        .recommend(&intraday_with_support(99.5), &one_dte_call())
        .unwrap();

    let primary = set.primary();
    assert_eq!(primary.horizon, TradeHorizon::Scalp);
    assert_eq!(primary.basis_kind, BasisKind::SupportResistance);
    assert!(!primary.buffer_capped);
    assert!((primary.level - 99.5).abs() < 1e-9);
    assert!(primary.basis.starts_with("support/resistance"));
    assert!((primary.percentage_from_current - 0.5).abs() < 1e-9);
}

#[test]
fn test_cap_overrides_distant_support() {
    let engine = engine_without_scalp_buffer();
    let set = engine
        .recommend(&intraday_with_support(98.5), &one_dte_call())
        .unwrap();

    let primary = set.primary();
    assert!(primary.buffer_capped);
    assert!((primary.level - 99.0).abs() < 1e-9);
    assert!((primary.technical_level - 98.5).abs() < 1e-9);
    assert!(primary.basis.starts_with("policy cap"));
    assert!(!primary.basis.starts_with("support"));
    assert!(
        set.warnings()
            .iter()
            .any(|w| w.kind == WarningKind::PolicyCapped)
    );
}

#[test]
fn test_resolver_caps_only_beyond_limit() {
    let resolver = PrecedenceResolver::new(BufferPolicy::default(), 0.05);
    let candidate = |level| StopLossCandidate {
        level,
        basis: BasisKind::SupportResistance,
        horizon: TradeHorizon::Scalp,
        rationale: "support".to_string(),
    };

    let a = resolver.resolve(&[candidate(99.5)], OptionType::Call, Some(1), TradeHorizon::Scalp, 100.0);
    assert!(!a.buffer_capped);
    assert_eq!(a.level, 99.5);

    let b = resolver.resolve(&[candidate(98.5)], OptionType::Call, Some(1), TradeHorizon::Scalp, 100.0);
    assert!(b.buffer_capped);
    assert!((b.level - 99.0).abs() < 1e-9);
}

#[test]
fn test_same_day_atm_put_never_uses_delta() {
    let contract = OptionContract::new(496.48, 496.0, OptionType::Put, 3.50)
        .with_underlying("SPY")
        .with_dte(0)
        .with_iv(0.35)
        .with_greeks(-0.10, -2.5);
    let projector = OptionPriceProjector::default();
    assert!(projector.requires_full_model(&contract, 0));

    let model = projector.price_at(&contract, 501.44, 0);
    let naive = projector.delta_approximation(&contract, 501.44, -0.10);

    assert_ne!(model.method, PricingMethod::DeltaApproximation);
    let relative = (naive - model.price).abs() / naive;
    assert!(relative > 0.30, "model {} vs naive {naive}", model.price);
}

#[test]
fn test_one_dte_atm_put_runs_full_model() {
    let contract = OptionContract::new(496.48, 496.0, OptionType::Put, 3.50)
        .with_underlying("SPY")
        .with_dte(1)
        .with_iv(0.35)
        .with_greeks(-0.10, -2.5);
    let projector = OptionPriceProjector::default();
    assert!(projector.requires_full_model(&contract, 1));

    let model = projector.price_at(&contract, 501.44, 1);
    let naive = projector.delta_approximation(&contract, 501.44, -0.10);

    assert_eq!(model.method, PricingMethod::BlackScholes);
    assert_eq!(model.volatility, Some(0.35));
    assert!(model.price > 0.01);
    let relative = (naive - model.price).abs() / naive;
    assert!(relative > 0.30, "model {} vs naive {naive}", model.price);
}

#[test]
fn test_same_day_atm_put_through_engine() {
    let candles = (0..30)
        .map(|i| {
            let close = 496.48 + ((i as f64) * 0.9).sin() * 0.6;
            Candle::new(
                start() + Duration::minutes(5 * i),
                close,
                close + 0.4,
                close - 0.4,
                close,
                50_000.0,
            )
        })
        .collect();
    let series = PriceSeries::new(Granularity::Intraday, candles).unwrap();
    let contract = OptionContract::new(496.48, 496.0, OptionType::Put, 3.50)
        .with_underlying("SPY")
        .with_dte(0)
        .with_iv(0.35)
        .with_greeks(-0.10, -2.5);

    let set = StopLossEngine::default().recommend(&series, &contract).unwrap();
    let primary = set.primary();
    assert_eq!(primary.horizon, TradeHorizon::Scalp);
    assert!(primary.level > 496.48);
    assert_eq!(primary.pricing_method, PricingMethod::IntrinsicValue);
    assert!(
        set.warnings()
            .iter()
            .any(|w| w.kind == WarningKind::NearExpiryAtTheMoney)
    );
    // 0-DTE decays hourly.
    let Some(theta) = &primary.theta_projection else {
        panic!("quoted theta should yield a projection");
    };
    assert_eq!(theta.steps[0].timestamp - series.as_of(), Duration::hours(1));
}

#[test]
fn test_unknown_dte_evaluates_every_horizon() {
    let candles = (0..60)
        .map(|i| {
            let close = 50.0 + ((i as f64) * 0.45).sin() * 1.5;
            Candle::new(
                start() + Duration::days(i),
                close - 0.2,
                close + 0.6,
                close - 0.6,
                close,
                10_000.0,
            )
        })
        .collect();
    let series = PriceSeries::new(Granularity::Daily, candles).unwrap();
    let contract = OptionContract::new(50.0, 52.0, OptionType::Call, 1.10).with_iv(0.4);

    let set = StopLossEngine::default().recommend(&series, &contract).unwrap();
    assert_eq!(set.requested(), RequestedHorizon::Unknown);
    assert_eq!(
        set.horizons(),
        vec![TradeHorizon::Scalp, TradeHorizon::Swing, TradeHorizon::LongTerm]
    );
    assert_eq!(set.get(TradeHorizon::Swing), Some(set.primary()));
    for result in set.iter() {
        assert!(result.level < 50.0);
        assert!(result.max_buffer_percent > 0.0);
    }
}

#[test]
fn test_sections_are_ordered_and_complete() {
    let engine = engine_without_scalp_buffer();
    let set = engine
        .recommend(&intraday_with_support(99.5), &one_dte_call())
        .unwrap();
    let titles: Vec<_> = set.sections().iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Summary",
            "Stop Levels",
            "Option Projection",
            "Theta Decay",
            "Risk Warnings"
        ]
    );
    assert!(set.sections().iter().all(|s| !s.lines.is_empty()));
}
