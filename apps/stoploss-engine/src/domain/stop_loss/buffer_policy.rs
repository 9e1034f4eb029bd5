//! Buffer policy: maximum stop distance per option type and DTE.
//!
//! Calls are bounded from below (`level >= P * (1 - cap)`), puts from above
//! (`level <= P * (1 + cap)`).

use crate::config::{BufferCapTier, BufferPolicyConfig};
use crate::domain::market_data::OptionType;

use super::horizon::TradeHorizon;

/// Outcome of checking a level against its cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CapCheck {
    /// Level respects the cap and is used unmodified.
    Within,
    /// Level sits further away than allowed; `enforced` replaces it.
    Violated {
        /// Capped level.
        enforced: f64,
    },
}

/// Table-driven buffer cap policy.
#[derive(Debug, Clone)]
pub struct BufferPolicy {
    tiers: Vec<BufferCapTier>,
}

impl Default for BufferPolicy {
    fn default() -> Self {
        Self::new(&BufferPolicyConfig::default())
    }
}

impl BufferPolicy {
    /// Build from configuration (validated at config load).
    #[must_use]
    pub fn new(config: &BufferPolicyConfig) -> Self {
        Self {
            tiers: config.tiers.clone(),
        }
    }

    /// DTE assumed for a horizon when the contract's DTE is unknown:
    /// the longest DTE the horizon covers.
    #[must_use]
    pub const fn representative_dte(horizon: TradeHorizon) -> u32 {
        match horizon {
            TradeHorizon::Scalp => 2,
            TradeHorizon::Swing => 90,
            TradeHorizon::LongTerm => 365,
        }
    }

    /// Maximum allowed distance (fraction of current price).
    #[must_use]
    pub fn max_pct(&self, option_type: OptionType, dte: u32) -> f64 {
        let tier = self
            .tiers
            .iter()
            .find(|t| t.max_dte.is_none_or(|max| dte <= max))
            .or_else(|| self.tiers.last());
        match (tier, option_type) {
            (Some(t), OptionType::Call) => t.call_pct,
            (Some(t), OptionType::Put) => t.put_pct,
            // Empty tables are rejected by config validation.
            (None, _) => 0.0,
        }
    }

    /// Furthest level the cap allows.
    #[must_use]
    pub fn bound(&self, option_type: OptionType, dte: u32, current_price: f64) -> f64 {
        let cap = self.max_pct(option_type, dte);
        match option_type {
            OptionType::Call => current_price - current_price * cap,
            OptionType::Put => current_price + current_price * cap,
        }
    }

    /// Check a proposed level against the cap.
    #[must_use]
    pub fn check(
        &self,
        option_type: OptionType,
        dte: u32,
        current_price: f64,
        level: f64,
    ) -> CapCheck {
        let bound = self.bound(option_type, dte, current_price);
        let violated = match option_type {
            OptionType::Call => level < bound,
            OptionType::Put => level > bound,
        };
        if violated {
            CapCheck::Violated { enforced: bound }
        } else {
            CapCheck::Within
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 0.01, 0.01)]
    #[test_case(1, 0.01, 0.01)]
    #[test_case(2, 0.02, 0.02)]
    #[test_case(3, 0.03, 0.03)]
    #[test_case(5, 0.03, 0.03)]
    #[test_case(6, 0.05, 0.05)]
    #[test_case(60, 0.05, 0.05)]
    #[test_case(61, 0.05, 0.07)]
    #[test_case(365, 0.05, 0.07)]
    fn test_default_table(dte: u32, call: f64, put: f64) {
        let policy = BufferPolicy::default();
        assert!((policy.max_pct(OptionType::Call, dte) - call).abs() < 1e-12);
        assert!((policy.max_pct(OptionType::Put, dte) - put).abs() < 1e-12);
    }

    #[test]
    fn test_call_within_cap() {
        let policy = BufferPolicy::default();
        assert_eq!(
            policy.check(OptionType::Call, 1, 100.0, 99.5),
            CapCheck::Within
        );
    }

    #[test]
    fn test_call_violation_enforces_bound() {
        let policy = BufferPolicy::default();
        let CapCheck::Violated { enforced } = policy.check(OptionType::Call, 1, 100.0, 98.5) else {
            panic!("98.5 is 1.5% below 100 and must violate the 1% cap");
        };
        assert!((enforced - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_put_bounded_from_above() {
        let policy = BufferPolicy::default();
        assert_eq!(
            policy.check(OptionType::Put, 90, 100.0, 106.5),
            CapCheck::Within
        );
        let CapCheck::Violated { enforced } = policy.check(OptionType::Put, 30, 100.0, 106.5)
        else {
            panic!("6.5% above exceeds the 5% put cap at 30 DTE");
        };
        assert!((enforced - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_representative_dte_matches_horizon() {
        for horizon in TradeHorizon::ALL {
            assert_eq!(
                TradeHorizon::from_dte(BufferPolicy::representative_dte(horizon)),
                horizon
            );
        }
    }
}
