//! Reports module for LedgerLens
//!
//! Each report is computed once from records and configuration, then
//! rendered for the terminal or exported as CSV. JSON export goes through
//! `export::export_report`, since every report is `Serialize`.

pub mod budget_overview;
pub mod business_metrics;
pub mod savings;
pub mod tax_report;
pub mod trend;

pub use budget_overview::{BudgetOverviewReport, BudgetReportRow};
pub use business_metrics::BusinessMetricsReport;
pub use savings::{SavingsReport, SavingsReportRow};
pub use tax_report::{QuarterRow, TaxReport};
pub use trend::TrendReport;
