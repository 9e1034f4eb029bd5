//! Configuration files drive engine behavior.

use std::io::Write;

use chrono::{TimeZone, Utc};
use stoploss_engine::config::{ConfigError, load_config};
use stoploss_engine::domain::stop_loss::BufferPolicy;
use stoploss_engine::{
    Candle, Granularity, OptionContract, OptionType, PriceSeries, StopLossEngine,
};

const TIGHT_POLICY: &str = r"
engine:
  conservative_default_pct: 0.04
buffer_policy:
  tiers:
    - { max_dte: 5, call_pct: 0.005, put_pct: 0.005 }
    - { max_dte: null, call_pct: 0.02, put_pct: 0.03 }
pricing:
  risk_free_rate: 0.04
observability:
  logging:
    level: debug
    format: json
";

fn write_config(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_from_file() {
    let file = write_config(TIGHT_POLICY);
    let config = load_config(file.path().to_str()).unwrap();

    assert!((config.engine.conservative_default_pct - 0.04).abs() < f64::EPSILON);
    assert_eq!(config.buffer_policy.tiers.len(), 2);
    assert!((config.pricing.risk_free_rate - 0.04).abs() < f64::EPSILON);
    assert_eq!(config.observability.logging.format, "json");
    // Unspecified sections keep their defaults.
    assert_eq!(config.engine.horizons.swing.atr_window, 14);
    assert_eq!(config.projection.steps, 5);
}

#[test]
fn test_custom_tiers_change_the_cap() {
    let file = write_config(TIGHT_POLICY);
    let config = load_config(file.path().to_str()).unwrap();
    let policy = BufferPolicy::new(&config.buffer_policy);

    assert!((policy.max_pct(OptionType::Call, 3) - 0.005).abs() < 1e-12);
    assert!((policy.max_pct(OptionType::Put, 30) - 0.03).abs() < 1e-12);

    // No history at all: the fixed fallback (5% for swing) is capped at 2%.
    let engine = StopLossEngine::new(config);
    let bar = Candle::new(Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap(), 100.0, 101.0, 99.0, 100.0, 1_000.0);
    let series = PriceSeries::new(Granularity::Daily, vec![bar]).unwrap();
    let contract = OptionContract::new(100.0, 100.0, OptionType::Call, 2.0)
        .with_dte(30)
        .with_iv(0.3);
    let set = engine.recommend(&series, &contract).unwrap();
    assert!(set.primary().buffer_capped);
    assert!((set.primary().level - 98.0).abs() < 1e-9);
}

#[test]
fn test_missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let result = load_config(path.to_str());
    assert!(matches!(result, Err(ConfigError::ReadError { .. })));
}

#[test]
fn test_unsorted_tiers_rejected() {
    let file = write_config(
        r"
buffer_policy:
  tiers:
    - { max_dte: 30, call_pct: 0.05, put_pct: 0.05 }
    - { max_dte: 10, call_pct: 0.05, put_pct: 0.05 }
    - { max_dte: null, call_pct: 0.05, put_pct: 0.07 }
",
    );
    let result = load_config(file.path().to_str());
    assert!(matches!(result, Err(ConfigError::ValidationError(_))));
}
