//! JSON export functionality
//!
//! Wraps any report in an envelope carrying the schema version and the
//! export timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{LedgerLensError, LedgerLensResult};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportExport<T> {
    /// Schema version for compatibility checking
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    /// Application version that created the export
    pub app_version: String,
    /// e.g. "business-metrics", "tax"
    pub report_type: String,
    pub report: T,
}

impl<T: Serialize> ReportExport<T> {
    pub fn new(report_type: impl Into<String>, report: T) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            report_type: report_type.into(),
            report,
        }
    }
}

/// Serialize `report` inside a `ReportExport` envelope
pub fn export_report<T, W>(
    report_type: &str,
    report: &T,
    writer: &mut W,
    pretty: bool,
) -> LedgerLensResult<()>
where
    T: Serialize,
    W: Write,
{
    let export = ReportExport::new(report_type, report);

    let result = if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    };
    result.map_err(|e| LedgerLensError::Export(format!("Failed to serialize report: {}", e)))?;

    writeln!(writer).map_err(|e| LedgerLensError::Export(e.to_string()))?;
    Ok(())
}
