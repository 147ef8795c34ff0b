//! Export functionality for LedgerLens
//!
//! CSV rows for reports and records, and a versioned JSON envelope for any
//! report.

pub mod csv;
pub mod json;

pub use self::csv::{export_records_csv, write_rows};
pub use self::json::{export_report, ReportExport, EXPORT_SCHEMA_VERSION};
