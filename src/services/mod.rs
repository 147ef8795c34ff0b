//! Service layer for LedgerLens
//!
//! The computation engine (period resolution, aggregation, growth and
//! ratios, progressive tax, KPI classification, progress tracking) plus CSV
//! import. Engine functions are pure: they take slices and configuration and
//! never touch storage.

pub mod aggregate;
pub mod growth;
pub mod import;
pub mod kpi;
pub mod period;
pub mod progress;
pub mod tax;

pub use aggregate::{
    aggregate, aggregate_by, aggregate_where, bucket_series, AggregateResult, Bucket,
    BucketTotals, Granularity, UNCATEGORIZED,
};
pub use growth::{growth, profit_margin, retention, safe_ratio, FinancialRatios, GrowthMetric};
pub use import::{ColumnMapping, ImportResult, ImportService};
pub use kpi::{classify, classify_with_trend, trend_from_delta, KpiClassification, KpiEvaluator};
pub use period::{NamedRange, PeriodResolver};
pub use progress::{band, days_remaining, progress, savings_progress};
pub use tax::{compute_tax, quarterly_estimate, TaxMode};
