//! Ordered display sections and risk warnings.
//!
//! Sections are built once, in a fixed order, when a recommendation is
//! assembled. Renderers only read them.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::market_data::OptionContract;
use crate::domain::stop_loss::{BasisKind, RequestedHorizon, StopLossResult, TradeHorizon};

/// Loss at the stop above which a warning is raised, percent.
pub const SEVERE_LOSS_PERCENT: f64 = 50.0;

/// Display section kind, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Contract and primary stop.
    Summary,
    /// Stop level per horizon.
    StopLevels,
    /// Option price at each stop.
    OptionProjection,
    /// Theta decay of the primary horizon.
    ThetaDecay,
    /// Risk warnings.
    RiskWarnings,
}

impl SectionKind {
    /// Section title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Summary => "Summary",
            Self::StopLevels => "Stop Levels",
            Self::OptionProjection => "Option Projection",
            Self::ThetaDecay => "Theta Decay",
            Self::RiskWarnings => "Risk Warnings",
        }
    }
}

/// One titled block of display lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySection {
    /// Section kind.
    pub kind: SectionKind,
    /// Section title.
    pub title: String,
    /// Lines, in order.
    pub lines: Vec<String>,
}

impl DisplaySection {
    fn new(kind: SectionKind, lines: Vec<String>) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            lines,
        }
    }
}

impl std::fmt::Display for DisplaySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        for line in &self.lines {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}

/// Kind of risk warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Technical level replaced by the buffer cap.
    PolicyCapped,
    /// No technical signal; fixed or default distance used.
    FallbackBasis,
    /// Near expiry and near the money.
    NearExpiryAtTheMoney,
    /// Option loses more than half its value at the stop.
    SevereOptionLoss,
}

/// A risk warning attached to a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskWarning {
    /// Warning kind.
    pub kind: WarningKind,
    /// Horizon concerned, `None` for contract-wide warnings.
    pub horizon: Option<TradeHorizon>,
    /// Message.
    pub message: String,
}

/// Collect warnings for a set of results.
pub(crate) fn risk_warnings<'a>(
    near_expiry_atm: bool,
    contract: &OptionContract,
    results: impl IntoIterator<Item = &'a StopLossResult>,
) -> Vec<RiskWarning> {
    let mut warnings = Vec::new();
    if near_expiry_atm {
        warnings.push(RiskWarning {
            kind: WarningKind::NearExpiryAtTheMoney,
            horizon: None,
            message: format!(
                "Strike {} is {}% from the underlying with {} DTE: small moves can erase most of the premium",
                round2(contract.strike),
                round2(contract.moneyness_distance() * 100.0),
                contract
                    .days_to_expiration
                    .map_or_else(|| "unknown".to_string(), |d| d.to_string()),
            ),
        });
    }

    for r in results {
        if r.buffer_capped {
            warnings.push(RiskWarning {
                kind: WarningKind::PolicyCapped,
                horizon: Some(r.horizon),
                message: format!(
                    "{} stop limited to {}% by buffer policy; {} level {} is further away",
                    r.horizon,
                    round2(r.max_buffer_percent),
                    r.basis_kind,
                    round2(r.technical_level),
                ),
            });
        }
        if matches!(
            r.basis_kind,
            BasisKind::FixedFallback | BasisKind::ConservativeDefault
        ) {
            warnings.push(RiskWarning {
                kind: WarningKind::FallbackBasis,
                horizon: Some(r.horizon),
                message: format!(
                    "{} stop uses a {} distance, no technical signal was available",
                    r.horizon, r.basis_kind
                ),
            });
        }
        if r.option_loss_percent > SEVERE_LOSS_PERCENT {
            warnings.push(RiskWarning {
                kind: WarningKind::SevereOptionLoss,
                horizon: Some(r.horizon),
                message: format!(
                    "Option projected to lose {}% at the {} stop",
                    round2(r.option_loss_percent),
                    r.horizon
                ),
            });
        }
    }
    warnings
}

/// Build the ordered display sections.
pub(crate) fn build_sections(
    contract: &OptionContract,
    requested: RequestedHorizon,
    primary: &StopLossResult,
    results: &[&StopLossResult],
    warnings: &[RiskWarning],
) -> Vec<DisplaySection> {
    let dte = contract
        .days_to_expiration
        .map_or_else(|| "DTE unknown".to_string(), |d| format!("{d} DTE"));
    let name = if contract.underlying.is_empty() {
        String::new()
    } else {
        format!("{} ", contract.underlying)
    };

    let summary = vec![
        format!(
            "{name}{} {} ({dte}), underlying {}, premium {}",
            round2(contract.strike),
            contract.option_type,
            round2(contract.underlying_price),
            round2(contract.current_option_price),
        ),
        format!("Horizon: {requested}, primary: {}", primary.horizon),
        format!(
            "Primary stop: {} ({}% from current), {}",
            round2(primary.level),
            round2(primary.percentage_from_current),
            primary.basis
        ),
    ];

    let stop_levels = results
        .iter()
        .map(|r| {
            format!(
                "{}: {} ({}%, cap {}%){} {}",
                r.horizon,
                round2(r.level),
                round2(r.percentage_from_current),
                round2(r.max_buffer_percent),
                if r.buffer_capped { " [capped]" } else { "" },
                r.basis,
            )
        })
        .collect();

    let option_projection = results
        .iter()
        .map(|r| {
            format!(
                "{}: {} via {} ({}% loss)",
                r.horizon,
                round2(r.option_price_at_stop),
                r.pricing_method,
                round2(r.option_loss_percent),
            )
        })
        .collect();

    let theta_decay = primary.theta_projection.as_ref().map_or_else(
        || vec!["Theta unavailable".to_string()],
        |p| {
            std::iter::once(format!(
                "{} steps at {} per day from {}",
                p.interval,
                round2(p.theta_per_day),
                round2(p.starting_price)
            ))
            .chain(p.steps.iter().map(|s| {
                format!(
                    "{}: {} (-{}%, cumulative -{}%)",
                    s.timestamp.format("%Y-%m-%d %H:%M"),
                    round2(s.projected_price),
                    round2(s.interval_loss_percent),
                    round2(s.cumulative_loss_percent),
                )
            }))
            .collect()
        },
    );

    let risk = if warnings.is_empty() {
        vec!["None".to_string()]
    } else {
        warnings.iter().map(|w| w.message.clone()).collect()
    };

    vec![
        DisplaySection::new(SectionKind::Summary, summary),
        DisplaySection::new(SectionKind::StopLevels, stop_levels),
        DisplaySection::new(SectionKind::OptionProjection, option_projection),
        DisplaySection::new(SectionKind::ThetaDecay, theta_decay),
        DisplaySection::new(SectionKind::RiskWarnings, risk),
    ]
}

/// Two decimals, rounded half away from zero.
pub(crate) fn round2(value: f64) -> String {
    Decimal::from_f64(value).map_or_else(
        || format!("{value:.2}"),
        |d| {
            let d = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("{d:.2}")
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::OptionType;
    use crate::pricing::PricingMethod;

    fn result(horizon: TradeHorizon) -> StopLossResult {
        StopLossResult {
            horizon,
            level: 99.0,
            basis: "policy cap: 1.0% max distance".to_string(),
            basis_kind: BasisKind::SupportResistance,
            technical_level: 98.5,
            percentage_from_current: 1.0,
            buffer_capped: true,
            max_buffer_percent: 1.0,
            option_price_at_stop: 0.4,
            option_loss_percent: 80.0,
            pricing_method: PricingMethod::BlackScholes,
            theta_projection: None,
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.6751), "2.68");
        assert_eq!(round2(-0.125), "-0.13");
        assert_eq!(round2(99.5), "99.50");
    }

    #[test]
    fn test_warnings_for_capped_severe_result() {
        let contract = OptionContract::new(100.0, 100.0, OptionType::Call, 2.0).with_dte(1);
        let r = result(TradeHorizon::Scalp);
        let warnings = risk_warnings(true, &contract, [&r]);
        let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![
                WarningKind::NearExpiryAtTheMoney,
                WarningKind::PolicyCapped,
                WarningKind::SevereOptionLoss
            ]
        );
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let contract = OptionContract::new(100.0, 100.0, OptionType::Call, 2.0)
            .with_underlying("SPY")
            .with_dte(1);
        let r = result(TradeHorizon::Scalp);
        let sections = build_sections(
            &contract,
            RequestedHorizon::Known(TradeHorizon::Scalp),
            &r,
            &[&r],
            &[],
        );
        let kinds: Vec<_> = sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Summary,
                SectionKind::StopLevels,
                SectionKind::OptionProjection,
                SectionKind::ThetaDecay,
                SectionKind::RiskWarnings
            ]
        );
        assert!(sections[0].lines[0].starts_with("SPY 100.00 CALL"));
        assert!(sections[1].lines[0].contains("[capped]"));
        assert_eq!(sections[4].lines, vec!["None".to_string()]);
    }
}
