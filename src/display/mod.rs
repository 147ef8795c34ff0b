//! Display formatting for terminal output
//!
//! Formatting helpers shared by the reports, and the category-specific
//! wording and table layout for KPIs.

pub mod kpi;
pub mod record;
pub mod report;

pub use kpi::{format_kpi_table, status_label};
pub use record::format_record_list;
pub use report::{format_bar, format_change, format_percentage, format_progress};
