//! KPI model
//!
//! KPIs are recomputed from current aggregates on every report and are
//! never persisted. Only the target table is configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::money::Money;

/// Canonical status of a KPI against its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiStatus {
    /// Meets or beats the target
    Positive,
    /// Misses the target by no more than the band width
    Warning,
    Negative,
}

impl fmt::Display for KpiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Warning => write!(f, "warning"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

/// Direction of a metric between two periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Up => "↑",
            Self::Down => "↓",
            Self::Stable => "→",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

/// Grouping used by the presentation layer to pick status labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiCategory {
    Financial,
    Growth,
    Customer,
    Operational,
}

impl fmt::Display for KpiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Financial => write!(f, "Financial"),
            Self::Growth => write!(f, "Growth"),
            Self::Customer => write!(f, "Customer"),
            Self::Operational => write!(f, "Operational"),
        }
    }
}

/// The metrics the business-metrics report knows how to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiMetric {
    ProfitMargin,
    RevenueGrowth,
    ClientRetention,
    /// Expenses as a percentage of revenue
    ExpenseRatio,
    /// Collected share of everything invoiced in the window
    CollectionRate,
    CurrentRatio,
    DebtToEquity,
    ReturnOnAssets,
}

impl KpiMetric {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ProfitMargin => "Profit Margin",
            Self::RevenueGrowth => "Revenue Growth",
            Self::ClientRetention => "Client Retention",
            Self::ExpenseRatio => "Expense Ratio",
            Self::CollectionRate => "Collection Rate",
            Self::CurrentRatio => "Current Ratio",
            Self::DebtToEquity => "Debt to Equity",
            Self::ReturnOnAssets => "Return on Assets",
        }
    }

    /// Whether the metric reads as a percentage (vs a plain ratio)
    pub fn is_percentage(&self) -> bool {
        !matches!(self, Self::CurrentRatio | Self::DebtToEquity)
    }
}

impl FromStr for KpiMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "profit_margin" => Ok(Self::ProfitMargin),
            "revenue_growth" => Ok(Self::RevenueGrowth),
            "client_retention" | "retention" => Ok(Self::ClientRetention),
            "expense_ratio" => Ok(Self::ExpenseRatio),
            "collection_rate" => Ok(Self::CollectionRate),
            "current_ratio" => Ok(Self::CurrentRatio),
            "debt_to_equity" => Ok(Self::DebtToEquity),
            "return_on_assets" | "roa" => Ok(Self::ReturnOnAssets),
            other => Err(format!("Unknown KPI metric: {}", other)),
        }
    }
}

/// One row of the KPI target table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiTarget {
    pub metric: KpiMetric,
    pub target: f64,
    /// Tolerance on the worse side of the target that still reads as a warning
    pub band_width: f64,
    #[serde(default = "default_higher_is_better")]
    pub higher_is_better: bool,
    pub category: KpiCategory,
}

fn default_higher_is_better() -> bool {
    true
}

impl KpiTarget {
    pub fn new(
        metric: KpiMetric,
        target: f64,
        band_width: f64,
        higher_is_better: bool,
        category: KpiCategory,
    ) -> Self {
        Self {
            metric,
            target,
            band_width,
            higher_is_better,
            category,
        }
    }

    /// The stock target table used when the configuration does not override it
    pub fn defaults() -> Vec<KpiTarget> {
        use KpiCategory::*;
        use KpiMetric::*;
        vec![
            KpiTarget::new(ProfitMargin, 20.0, 10.0, true, Financial),
            KpiTarget::new(RevenueGrowth, 10.0, 10.0, true, Growth),
            KpiTarget::new(ClientRetention, 80.0, 10.0, true, Customer),
            KpiTarget::new(ExpenseRatio, 70.0, 10.0, false, Operational),
            KpiTarget::new(CollectionRate, 90.0, 15.0, true, Operational),
            KpiTarget::new(CurrentRatio, 1.5, 0.5, true, Financial),
            KpiTarget::new(DebtToEquity, 1.0, 0.5, false, Financial),
            KpiTarget::new(ReturnOnAssets, 5.0, 5.0, true, Financial),
        ]
    }
}

/// A KPI value as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum KpiValue {
    Amount(Money),
    Percent(f64),
    Ratio(f64),
    Count(u64),
    Text(String),
}

impl KpiValue {
    /// Numeric reading used for classification; text values have none
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Amount(m) => Some(m.as_f64()),
            Self::Percent(v) | Self::Ratio(v) => Some(*v),
            Self::Count(c) => Some(*c as f64),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for KpiValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amount(m) => write!(f, "{}", m),
            Self::Percent(v) => write!(f, "{:.1}%", v),
            Self::Ratio(v) => write!(f, "{:.2}", v),
            Self::Count(c) => write!(f, "{}", c),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A classified indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub name: String,
    pub metric: KpiMetric,
    pub value: KpiValue,
    pub target: KpiValue,
    pub status: KpiStatus,
    pub trend: Trend,
    pub category: KpiCategory,
}
