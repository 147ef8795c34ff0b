//! Report output for the CLI
//!
//! Every report can be printed as a terminal table, CSV or a JSON export
//! envelope, either to stdout or to a file.

use clap::{Args, ValueEnum};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::error::{LedgerLensError, LedgerLensResult};
use crate::export::export_report;
use crate::reports::{
    BudgetOverviewReport, BusinessMetricsReport, SavingsReport, TaxReport, TrendReport,
};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal layout
    Table,
    /// CSV rows
    Csv,
    /// JSON with a schema-versioned envelope
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// A report the CLI knows how to print and export
pub trait Renderable: Serialize {
    /// Tag written into the JSON export envelope
    const REPORT_TYPE: &'static str;

    fn render_terminal(&self, currency: &str) -> String;

    fn render_csv(&self, writer: &mut dyn Write) -> LedgerLensResult<()>;
}

macro_rules! renderable {
    ($report:ty, $tag:literal) => {
        impl Renderable for $report {
            const REPORT_TYPE: &'static str = $tag;

            fn render_terminal(&self, currency: &str) -> String {
                self.format_terminal(currency)
            }

            fn render_csv(&self, mut writer: &mut dyn Write) -> LedgerLensResult<()> {
                self.export_csv(&mut writer)
            }
        }
    };
}

renderable!(BusinessMetricsReport, "business-metrics");
renderable!(TaxReport, "tax");
renderable!(BudgetOverviewReport, "budget-overview");
renderable!(SavingsReport, "savings");
renderable!(TrendReport, "trend");

fn write_report<R: Renderable>(
    report: &R,
    format: OutputFormat,
    currency: &str,
    writer: &mut dyn Write,
) -> LedgerLensResult<()> {
    match format {
        OutputFormat::Table => writer
            .write_all(report.render_terminal(currency).as_bytes())
            .map_err(|e| LedgerLensError::Export(e.to_string())),
        OutputFormat::Csv => report.render_csv(writer),
        OutputFormat::Json => {
            let mut writer = writer;
            export_report(R::REPORT_TYPE, report, &mut writer, true)
        }
    }
}

/// Print or save a report in the requested format
pub fn emit<R: Renderable>(report: &R, args: &OutputArgs, currency: &str) -> LedgerLensResult<()> {
    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                LedgerLensError::Export(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let mut writer = BufWriter::new(file);
            write_report(report, args.format, currency, &mut writer)?;
            writer
                .flush()
                .map_err(|e| LedgerLensError::Export(e.to_string()))?;
            tracing::info!(report = R::REPORT_TYPE, path = %path.display(), "exported report");
            println!("Report exported to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write_report(report, args.format, currency, &mut handle)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MonetaryRecord, Money, RecordKind};
    use crate::services::aggregate::Granularity;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn report() -> TrendReport {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let records = vec![MonetaryRecord::new(
            Money::from_units(100),
            today,
            RecordKind::Income,
        )];
        TrendReport::generate(&records, today, 2, Granularity::Month).unwrap()
    }

    #[test]
    fn test_json_export_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trend.json");
        let args = OutputArgs {
            format: OutputFormat::Json,
            output: Some(path.clone()),
        };

        emit(&report(), &args, "$").unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["report_type"], "trend");
        assert_eq!(value["report"]["buckets"][1]["total_credit"], 10_000);
    }

    #[test]
    fn test_csv_to_writer() {
        let mut out = Vec::new();
        write_report(&report(), OutputFormat::Csv, "$", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Mar 2025,2025-03-01,2025-03-31,100.00,0.00,100.00"));
    }
}
