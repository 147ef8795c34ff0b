//! Growth and ratio calculator
//!
//! Every function here is total: a zero denominator yields `0.0`, never
//! `NaN` or an infinity. An account with no history is a normal state, and
//! dashboards render it as zero growth rather than an error.

use serde::{Deserialize, Serialize};

use crate::models::Money;

/// Period-over-period change of one figure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthMetric {
    pub current: Money,
    pub previous: Money,
    /// Zero whenever `previous` is zero
    pub growth_pct: f64,
}

impl GrowthMetric {
    pub fn delta(&self) -> Money {
        self.current - self.previous
    }
}

/// `numerator / denominator`, or zero when the quotient is not finite
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        0.0
    }
}

/// Growth of `current` over `previous` in percent
pub fn growth(current: Money, previous: Money) -> GrowthMetric {
    GrowthMetric {
        current,
        previous,
        growth_pct: growth_pct(current.as_f64(), previous.as_f64()),
    }
}

/// Growth in percent for plain numbers (counts, percentages)
pub fn growth_pct(current: f64, previous: f64) -> f64 {
    safe_ratio(current - previous, previous) * 100.0
}

/// Share of revenue left after expenses, in percent
pub fn profit_margin(revenue: Money, expenses: Money) -> f64 {
    safe_ratio((revenue - expenses).as_f64(), revenue.as_f64()) * 100.0
}

/// Share of clients that are not new this period, in percent, floored at zero
pub fn retention(total_clients: usize, new_clients: usize) -> f64 {
    let total = total_clients as f64;
    let retained = total - new_clients as f64;
    (safe_ratio(retained, total) * 100.0).max(0.0)
}

/// Simplified liquidity and return ratios
///
/// These are approximations, not balance-sheet accounting: callers feed in
/// whatever stands in for assets and liabilities (the business-metrics
/// report uses revenue and expenses), and `quick_ratio` is a fixed 80% of
/// `current_ratio` rather than a computation over liquid assets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialRatios {
    pub current_ratio: f64,
    pub quick_ratio: f64,
    pub debt_to_equity: f64,
    /// Percent
    pub return_on_assets: f64,
}

impl FinancialRatios {
    pub fn from_totals(assets: Money, liabilities: Money, revenue: Money, expenses: Money) -> Self {
        let assets_f = assets.as_f64();
        let liabilities_f = liabilities.as_f64();

        let current_ratio = safe_ratio(assets_f, liabilities_f);
        let debt_to_equity = if liabilities.is_positive() && assets > liabilities {
            safe_ratio(liabilities_f, assets_f - liabilities_f)
        } else {
            0.0
        };

        Self {
            current_ratio,
            quick_ratio: current_ratio * 0.8,
            debt_to_equity,
            return_on_assets: safe_ratio((revenue - expenses).as_f64(), assets_f) * 100.0,
        }
    }
}
