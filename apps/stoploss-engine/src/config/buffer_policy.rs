//! Buffer cap table: risk tolerance per DTE and option type.

use serde::{Deserialize, Serialize};

/// One row of the buffer cap table.
///
/// A tier applies to every DTE up to and including `max_dte`; the last tier
/// has `max_dte = None` and covers everything beyond.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferCapTier {
    /// Inclusive upper DTE bound (`None` = open-ended).
    pub max_dte: Option<u32>,
    /// Maximum stop distance for calls (fraction of current price).
    pub call_pct: f64,
    /// Maximum stop distance for puts (fraction of current price).
    pub put_pct: f64,
}

impl BufferCapTier {
    const fn new(max_dte: Option<u32>, call_pct: f64, put_pct: f64) -> Self {
        Self {
            max_dte,
            call_pct,
            put_pct,
        }
    }
}

/// Buffer policy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferPolicyConfig {
    /// Tiers ordered by `max_dte`, last one open-ended.
    #[serde(default = "default_tiers")]
    pub tiers: Vec<BufferCapTier>,
}

impl Default for BufferPolicyConfig {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
        }
    }
}

fn default_tiers() -> Vec<BufferCapTier> {
    vec![
        BufferCapTier::new(Some(1), 0.01, 0.01),
        BufferCapTier::new(Some(2), 0.02, 0.02),
        BufferCapTier::new(Some(5), 0.03, 0.03),
        BufferCapTier::new(Some(60), 0.05, 0.05),
        BufferCapTier::new(None, 0.05, 0.07),
    ]
}

impl BufferPolicyConfig {
    /// Check ordering, bounds and monotonicity of the table.
    pub(crate) fn validate(&self) -> Result<(), String> {
        let Some((last, body)) = self.tiers.split_last() else {
            return Err("buffer_policy.tiers must not be empty".to_string());
        };
        if last.max_dte.is_some() {
            return Err("buffer_policy.tiers: last tier must be open-ended (max_dte: null)".to_string());
        }
        if body.iter().any(|t| t.max_dte.is_none()) {
            return Err("buffer_policy.tiers: only the last tier may be open-ended".to_string());
        }
        for tier in &self.tiers {
            for pct in [tier.call_pct, tier.put_pct] {
                if !(pct > 0.0 && pct < 1.0) {
                    return Err(format!(
                        "buffer_policy.tiers: cap {pct} must be between 0.0 and 1.0"
                    ));
                }
            }
        }
        for pair in self.tiers.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if let (Some(x), Some(y)) = (a.max_dte, b.max_dte) {
                if y <= x {
                    return Err("buffer_policy.tiers must be sorted by max_dte".to_string());
                }
            }
            if b.call_pct < a.call_pct || b.put_pct < a.put_pct {
                return Err(
                    "buffer_policy.tiers caps must be non-decreasing as DTE increases".to_string(),
                );
            }
        }
        if last.put_pct < last.call_pct {
            return Err(
                "buffer_policy.tiers: long-dated put cap must be at least the call cap".to_string(),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        assert!(BufferPolicyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_decreasing_caps() {
        let config = BufferPolicyConfig {
            tiers: vec![
                BufferCapTier::new(Some(5), 0.03, 0.03),
                BufferCapTier::new(None, 0.02, 0.07),
            ],
        };
        let Err(msg) = config.validate() else {
            panic!("expected decreasing caps to fail");
        };
        assert!(msg.contains("non-decreasing"));
    }

    #[test]
    fn test_rejects_bounded_last_tier() {
        let config = BufferPolicyConfig {
            tiers: vec![BufferCapTier::new(Some(5), 0.03, 0.03)],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_put_below_call_long_dated() {
        let config = BufferPolicyConfig {
            tiers: vec![
                BufferCapTier::new(Some(60), 0.05, 0.05),
                BufferCapTier::new(None, 0.08, 0.06),
            ],
        };
        assert!(config.validate().is_err());
    }
}
