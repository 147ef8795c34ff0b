//! Core data models for LedgerLens
//!
//! Monetary records and reporting windows feed the engine; budgets, savings
//! goals and clients are the entities progress and retention are measured
//! against; tax, KPI and progress types are the engine's inputs and outputs.

pub mod ids;
pub mod kpi;
pub mod money;
pub mod plan;
pub mod progress;
pub mod record;
pub mod tax;
pub mod window;

pub use ids::{BudgetId, ClientId, GoalId, RecordId};
pub use kpi::{Kpi, KpiCategory, KpiMetric, KpiStatus, KpiTarget, KpiValue, Trend};
pub use money::Money;
pub use plan::{Budget, Client, Identified, SavingsGoal};
pub use progress::{ProgressBand, ProgressState, ProgressThresholds, SavingsProgress};
pub use record::{MonetaryRecord, RecordKind, RecordStatus};
pub use tax::{
    BracketShare, QuarterlyEstimate, QuarterlyEstimateRule, TaxBracket, TaxResult, TaxSchedule,
};
pub use window::PeriodWindow;
