//! Property tests for stop-loss invariants.
//!
//! 1. Cap monotonicity: caps never tighten as DTE grows; puts get more room
//!    than calls beyond 60 DTE
//! 2. No override: an uncapped level is exactly the winning candidate's level
//! 3. Cap bound: a resolved level never sits further away than its cap
//! 4. Expiry convergence: Black-Scholes tends to intrinsic value as T -> 0
//! 5. Engine output: always a primary, always on the stop side

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use stoploss_engine::domain::stop_loss::{BufferPolicy, PrecedenceResolver, StopLossCandidate};
use stoploss_engine::pricing::black_scholes;
use stoploss_engine::{
    BasisKind, Candle, Granularity, OptionContract, OptionType, PriceSeries, StopLossEngine,
    TradeHorizon,
};

// ── Strategies ───────────────────────────────────────────────────────

fn arb_option_type() -> impl Strategy<Value = OptionType> {
    prop_oneof![Just(OptionType::Call), Just(OptionType::Put)]
}

fn arb_price() -> impl Strategy<Value = f64> {
    (5.0..800.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_basis() -> impl Strategy<Value = BasisKind> {
    prop_oneof![
        Just(BasisKind::Pattern),
        Just(BasisKind::SupportResistance),
        Just(BasisKind::Volatility),
        Just(BasisKind::FixedFallback),
    ]
}

/// Daily closes as a bounded random walk.
fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-0.03..0.03_f64, 5..60).prop_map(|moves| {
        let mut close = 100.0;
        moves
            .into_iter()
            .map(|m| {
                close *= 1.0 + m;
                close
            })
            .collect()
    })
}

fn series_from(closes: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2026, 1, 5, 0, 0, 0).unwrap();
    let candles = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            Candle::new(
                start + Duration::days(i as i64),
                c * 0.998,
                c * 1.01,
                c * 0.99,
                c,
                1_000.0 + (i % 7) as f64 * 150.0,
            )
        })
        .collect();
    PriceSeries::new(Granularity::Daily, candles).unwrap()
}

// ── 1. Cap monotonicity ──────────────────────────────────────────────

proptest! {
    #[test]
    fn cap_never_tightens_with_dte(dte in 0u32..500, extra in 0u32..500, option_type in arb_option_type()) {
        let policy = BufferPolicy::default();
        prop_assert!(policy.max_pct(option_type, dte) <= policy.max_pct(option_type, dte + extra));
    }

    #[test]
    fn puts_get_wider_cap_beyond_sixty_dte(dte in 61u32..2_000) {
        let policy = BufferPolicy::default();
        prop_assert!(policy.max_pct(OptionType::Put, dte) > policy.max_pct(OptionType::Call, dte));
    }

    #[test]
    fn calls_and_puts_share_cap_up_to_sixty_dte(dte in 0u32..=60) {
        let policy = BufferPolicy::default();
        prop_assert_eq!(policy.max_pct(OptionType::Put, dte), policy.max_pct(OptionType::Call, dte));
    }
}

// ── 2-3. Precedence resolution ───────────────────────────────────────

proptest! {
    #[test]
    fn uncapped_level_is_the_candidate_level(
        current in arb_price(),
        distance in 0.0001..0.5_f64,
        dte in 0u32..400,
        option_type in arb_option_type(),
        basis in arb_basis(),
    ) {
        let level = current * (1.0 - option_type.sign() * distance);
        let candidate = StopLossCandidate {
            level,
            basis,
            horizon: TradeHorizon::from_dte(dte),
            rationale: "generated".to_string(),
        };
        let resolver = PrecedenceResolver::new(BufferPolicy::default(), 0.05);
        let r = resolver.resolve(&[candidate], option_type, Some(dte), TradeHorizon::from_dte(dte), current);

        prop_assert_eq!(r.selected.basis, basis);
        if !r.buffer_capped {
            prop_assert_eq!(r.level, level);
            prop_assert!(!r.basis_label(option_type).starts_with("policy cap"));
        } else {
            prop_assert!(r.basis_label(option_type).starts_with("policy cap"));
        }
    }

    #[test]
    fn resolved_level_respects_cap(
        current in arb_price(),
        distance in -0.2..0.9_f64,
        dte in prop::option::of(0u32..400),
        option_type in arb_option_type(),
    ) {
        let horizon = dte.map_or(TradeHorizon::Swing, TradeHorizon::from_dte);
        let candidate = StopLossCandidate {
            level: current * (1.0 - option_type.sign() * distance),
            basis: BasisKind::Volatility,
            horizon,
            rationale: "generated".to_string(),
        };
        let resolver = PrecedenceResolver::new(BufferPolicy::default(), 0.05);
        let r = resolver.resolve(&[candidate], option_type, dte, horizon, current);

        let pct = (r.level - current).abs() / current;
        prop_assert!(pct <= r.cap_pct + 1e-12);
        match option_type {
            OptionType::Call => prop_assert!(r.level < current),
            OptionType::Put => prop_assert!(r.level > current),
        }
    }
}

// ── 4. Expiry convergence ────────────────────────────────────────────

proptest! {
    #[test]
    fn black_scholes_converges_to_intrinsic(
        s in 10.0..500.0_f64,
        k in 10.0..500.0_f64,
        sigma in 0.05..1.0_f64,
        option_type in arb_option_type(),
    ) {
        let Ok(model) = black_scholes::price(s, k, 1e-9, 0.05, 0.0, sigma, option_type) else {
            return Err(TestCaseError::fail("valid inputs must price"));
        };
        let intrinsic = option_type.intrinsic(s, k);
        prop_assert!((model - intrinsic).abs() < 0.01, "model {} intrinsic {}", model, intrinsic);
    }
}

// ── 5. Engine output ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn engine_always_yields_primary_on_stop_side(
        closes in arb_closes(),
        dte in prop::option::of(0u32..400),
        option_type in arb_option_type(),
        iv in prop::option::of(0.1..0.9_f64),
    ) {
        let series = series_from(&closes);
        let current = closes[closes.len() - 1];
        let mut contract = OptionContract::new(current, (current / 5.0).round() * 5.0, option_type, 2.5);
        contract.days_to_expiration = dte;
        contract.implied_volatility = iv;

        let engine = StopLossEngine::default();
        let Ok(set) = engine.recommend(&series, &contract) else {
            return Err(TestCaseError::fail("valid contract must produce a recommendation"));
        };

        prop_assert!(!set.is_empty());
        prop_assert_eq!(set.len(), if dte.is_some() { 1 } else { 3 });
        for result in set.iter() {
            match option_type {
                OptionType::Call => prop_assert!(result.level < current),
                OptionType::Put => prop_assert!(result.level > current),
            }
            prop_assert!(result.percentage_from_current <= result.max_buffer_percent + 1e-9);
            prop_assert!(result.option_price_at_stop >= 0.01);
        }

        // Identical inputs, identical output.
        let again = engine.recommend(&series, &contract);
        prop_assert_eq!(again.ok(), Some(set));
    }
}
