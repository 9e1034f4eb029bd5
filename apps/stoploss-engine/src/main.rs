//! Stop-Loss Engine Binary
//!
//! Computes a stop-loss recommendation for the contract in a JSON market
//! snapshot and prints the display sections followed by the JSON result.
//!
//! # Usage
//!
//! ```bash
//! stoploss-engine <snapshot.json> [--config <path>]
//! ```
//!
//! # Environment Variables
//!
//! - `STOPLOSS_CONFIG`: config file path when `--config` is not given
//!   (default: `stoploss.yaml` if present, built-in defaults otherwise)
//! - `RUST_LOG`: log filter (overrides `observability.logging.level`)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use stoploss_engine::application::use_cases::RecommendStopLossUseCase;
use stoploss_engine::config::{Config, DEFAULT_CONFIG_PATH, load_config};
use stoploss_engine::infrastructure::market_data::SnapshotMarketData;
use stoploss_engine::telemetry::init_telemetry;
use stoploss_engine::StopLossEngine;

#[derive(Debug, Parser)]
#[command(
    name = "stoploss-engine",
    version,
    about = "Stop-loss recommendation for a single-leg option position"
)]
struct Cli {
    /// JSON market snapshot (contract query, contract, price history).
    snapshot: PathBuf,

    /// Config file (default: stoploss.yaml if present, built-in defaults otherwise).
    #[arg(short, long, env = "STOPLOSS_CONFIG")]
    config: Option<String>,
}

fn resolve_config(explicit: Option<String>) -> anyhow::Result<Config> {
    match explicit {
        Some(p) => load_config(Some(&p)).with_context(|| format!("loading config from {p}")),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_config(None).context("loading stoploss.yaml")
        }
        None => Ok(Config::default()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(cli.config)?;

    if let Err(e) = init_telemetry(&config.observability.logging) {
        eprintln!("Tracing already initialized: {e}");
    }

    let market_data = SnapshotMarketData::load(&cli.snapshot)
        .with_context(|| format!("loading snapshot {}", cli.snapshot.display()))?;
    let query = market_data.query().clone();

    tracing::info!(
        ticker = %query.ticker,
        strike = query.strike,
        option_type = %query.option_type,
        expiration = %query.expiration,
        "Computing stop-loss recommendation"
    );

    let engine = Arc::new(StopLossEngine::new(config));
    let use_case = RecommendStopLossUseCase::new(Arc::new(market_data), engine);
    let recommendation = use_case
        .execute(&query)
        .await
        .with_context(|| format!("recommending stop-loss for {}", query.ticker))?;

    for section in recommendation.sections() {
        println!("{section}");
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&recommendation).context("serializing recommendation")?
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_snapshot_and_config() {
        let cli = match Cli::try_parse_from(["stoploss-engine", "spy.json", "-c", "custom.yaml"]) {
            Ok(cli) => cli,
            Err(e) => panic!("valid arguments should parse: {e}"),
        };
        assert_eq!(cli.snapshot, PathBuf::from("spy.json"));
        assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
    }

    #[test]
    fn test_snapshot_is_required() {
        assert!(Cli::try_parse_from(["stoploss-engine", "--config", "custom.yaml"]).is_err());
    }

    #[test]
    fn test_rejects_extra_positional() {
        assert!(Cli::try_parse_from(["stoploss-engine", "a.json", "b.json"]).is_err());
    }
}
