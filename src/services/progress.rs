//! Budget and savings progress tracker
//!
//! One calculation serves both budgets (allocated vs spent) and savings
//! goals (target vs saved). The band is recomputed from the percentage on
//! every call and carries no history.

use chrono::NaiveDate;

use crate::models::{
    Money, ProgressBand, ProgressState, ProgressThresholds, SavingsGoal, SavingsProgress,
};
use crate::services::growth::safe_ratio;

/// Progress of `consumed` against `allocated`
///
/// `remaining` is not clamped. A non-positive allocation reads as 0%.
pub fn progress(allocated: Money, consumed: Money) -> ProgressState {
    let percentage = if allocated.is_positive() {
        safe_ratio(consumed.as_f64(), allocated.as_f64()) * 100.0
    } else {
        0.0
    };

    ProgressState {
        allocated,
        consumed,
        remaining: allocated - consumed,
        percentage,
    }
}

/// Band for a progress bar; both thresholds are exclusive
pub fn band(percentage: f64, thresholds: &ProgressThresholds) -> ProgressBand {
    if percentage > thresholds.over_pct {
        ProgressBand::Over
    } else if percentage > thresholds.near_limit_pct {
        ProgressBand::NearLimit
    } else {
        ProgressBand::OnTrack
    }
}

/// Whole days from `today` to `target_date`; negative once overdue
pub fn days_remaining(target_date: NaiveDate, today: NaiveDate) -> i64 {
    (target_date - today).num_days()
}

pub fn savings_progress(goal: &SavingsGoal, today: NaiveDate) -> SavingsProgress {
    SavingsProgress {
        progress: progress(goal.target_amount, goal.current_amount),
        days_remaining: goal.target_date.map(|d| days_remaining(d, today)),
    }
}
