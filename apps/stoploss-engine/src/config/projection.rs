//! Theta decay projection settings.

use serde::{Deserialize, Serialize};

/// Theta projection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Number of projected intervals.
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// Hours per day used to size hourly intervals.
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            hours_per_day: default_hours_per_day(),
        }
    }
}

const fn default_steps() -> usize {
    5
}

const fn default_hours_per_day() -> f64 {
    24.0
}
