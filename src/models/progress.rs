//! Budget and savings progress model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Progress of an allowance being spent, or a target being saved toward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Budget allocation, or savings target
    pub allocated: Money,
    /// Amount spent, or amount saved
    pub consumed: Money,
    /// `allocated - consumed`; negative when over budget or past the target
    pub remaining: Money,
    /// Uncapped; see `display_percentage`
    pub percentage: f64,
}

impl ProgressState {
    /// Percentage for a progress bar, capped at 100
    pub fn display_percentage(&self) -> f64 {
        self.percentage.min(100.0)
    }

    pub fn is_exceeded(&self) -> bool {
        self.remaining.is_negative()
    }
}

/// Coloring band for a progress bar. Derived from the percentage on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressBand {
    OnTrack,
    NearLimit,
    Over,
}

impl fmt::Display for ProgressBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnTrack => write!(f, "on-track"),
            Self::NearLimit => write!(f, "near-limit"),
            Self::Over => write!(f, "over"),
        }
    }
}

/// Percentages at which a bar changes band (strictly greater than)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressThresholds {
    #[serde(default = "default_near_limit")]
    pub near_limit_pct: f64,
    #[serde(default = "default_over")]
    pub over_pct: f64,
}

fn default_near_limit() -> f64 {
    80.0
}

fn default_over() -> f64 {
    100.0
}

impl Default for ProgressThresholds {
    fn default() -> Self {
        Self {
            near_limit_pct: default_near_limit(),
            over_pct: default_over(),
        }
    }
}

/// Savings progress with its deadline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsProgress {
    pub progress: ProgressState,
    /// Whole days until the target date; negative once overdue
    pub days_remaining: Option<i64>,
}
