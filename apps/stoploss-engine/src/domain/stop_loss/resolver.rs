//! Precedence resolution and buffer-cap enforcement.
//!
//! The first valid candidate wins. Only then is the cap checked: a level
//! within its cap is returned untouched with its own basis, a level beyond it
//! is replaced by the cap bound and labelled as a policy cap.

use serde::{Deserialize, Serialize};

use crate::domain::market_data::OptionType;

use super::buffer_policy::{BufferPolicy, CapCheck};
use super::candidates::{BasisKind, StopLossCandidate};
use super::horizon::TradeHorizon;

/// Final level for one horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Candidate that won precedence (before any cap).
    pub selected: StopLossCandidate,
    /// Level after cap enforcement.
    pub level: f64,
    /// The cap replaced the selected level.
    pub buffer_capped: bool,
    /// Cap applied, as a fraction of the current price.
    pub cap_pct: f64,
    /// DTE used to look up the cap.
    pub cap_dte: u32,
}

impl Resolution {
    /// Human-readable basis. Capped levels never claim a technical basis.
    #[must_use]
    pub fn basis_label(&self, option_type: OptionType) -> String {
        if self.buffer_capped {
            format!(
                "policy cap: {:.1}% max distance for {option_type} at {} DTE ({} level {:.2} exceeded it)",
                self.cap_pct * 100.0,
                self.cap_dte,
                self.selected.basis,
                self.selected.level,
            )
        } else {
            format!("{}: {}", self.selected.basis, self.selected.rationale)
        }
    }
}

/// Picks the winning candidate and enforces the buffer policy.
#[derive(Debug, Clone)]
pub struct PrecedenceResolver {
    policy: BufferPolicy,
    conservative_pct: f64,
}

impl PrecedenceResolver {
    /// Create a resolver.
    #[must_use]
    pub const fn new(policy: BufferPolicy, conservative_pct: f64) -> Self {
        Self {
            policy,
            conservative_pct,
        }
    }

    /// Buffer policy in use.
    #[must_use]
    pub const fn policy(&self) -> &BufferPolicy {
        &self.policy
    }

    /// Resolve the stop level for `horizon`.
    ///
    /// `dte` is the contract's DTE; when unknown the horizon's representative
    /// DTE selects the cap.
    #[must_use]
    pub fn resolve(
        &self,
        candidates: &[StopLossCandidate],
        option_type: OptionType,
        dte: Option<u32>,
        horizon: TradeHorizon,
        current_price: f64,
    ) -> Resolution {
        let selected = match candidates
            .iter()
            .find(|c| c.is_valid(option_type, current_price))
        {
            Some(c) => c.clone(),
            None => {
                tracing::warn!(
                    %horizon,
                    %option_type,
                    candidates = candidates.len(),
                    "No usable candidate, synthesizing conservative default"
                );
                self.conservative_default(option_type, horizon, current_price)
            }
        };

        for skipped in candidates
            .iter()
            .take_while(|c| !c.is_valid(option_type, current_price))
        {
            tracing::debug!(%horizon, basis = %skipped.basis, level = skipped.level, "Candidate skipped: wrong side of price");
        }

        let cap_dte = dte.unwrap_or_else(|| BufferPolicy::representative_dte(horizon));
        let cap_pct = self.policy.max_pct(option_type, cap_dte);

        let (level, buffer_capped) =
            match self
                .policy
                .check(option_type, cap_dte, current_price, selected.level)
            {
                CapCheck::Within => (selected.level, false),
                CapCheck::Violated { enforced } => {
                    tracing::debug!(
                        %horizon,
                        basis = %selected.basis,
                        proposed = selected.level,
                        enforced,
                        "Buffer cap enforced"
                    );
                    (enforced, true)
                }
            };

        Resolution {
            selected,
            level,
            buffer_capped,
            cap_pct,
            cap_dte,
        }
    }

    fn conservative_default(
        &self,
        option_type: OptionType,
        horizon: TradeHorizon,
        current_price: f64,
    ) -> StopLossCandidate {
        StopLossCandidate {
            level: current_price * (1.0 - option_type.sign() * self.conservative_pct),
            basis: BasisKind::ConservativeDefault,
            horizon,
            rationale: format!(
                "{:.1}% from current price, no signal produced a usable level",
                self.conservative_pct * 100.0
            ),
        }
    }
}
