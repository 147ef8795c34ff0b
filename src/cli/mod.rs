//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the engine and storage.

pub mod budget;
pub mod client;
pub mod export;
pub mod goal;
pub mod import;
pub mod record;
pub mod report;
pub mod tax;

pub use budget::{handle_budget_command, BudgetCommands};
pub use client::{handle_client_command, ClientCommands};
pub use export::{emit, OutputArgs, OutputFormat, Renderable};
pub use goal::{handle_goal_command, GoalCommands};
pub use import::handle_import_command;
pub use record::{handle_record_command, RecordCommands};
pub use report::{handle_report_command, ReportCommands};
pub use tax::{handle_tax_command, TaxCommands};

use chrono::NaiveDate;
use clap::Args;

use crate::error::{LedgerLensError, LedgerLensResult};
use crate::models::window::parse_date;
use crate::models::{Money, PeriodWindow};
use crate::services::period::PeriodResolver;
use crate::storage::{RecordFilter, DEFAULT_TABLE};

/// Reporting window selection shared by list and report commands
#[derive(Args, Debug, Clone)]
pub struct PeriodArgs {
    /// Named range (this-month, last-month, quarter, ytd, last-year, ...),
    /// a month such as "March 2025", or "YYYY-MM-DD..YYYY-MM-DD"
    #[arg(short, long, default_value = "this-month")]
    pub period: String,

    /// Custom range start (YYYY-MM-DD); requires --to
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Custom range end (YYYY-MM-DD); requires --from
    #[arg(long, requires = "from")]
    pub to: Option<String>,
}

impl PeriodArgs {
    /// Resolve against `today`; `--from/--to` win over `--period`
    pub fn resolve(&self, today: NaiveDate) -> LedgerLensResult<PeriodWindow> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => PeriodResolver::resolve(
                "custom",
                today,
                Some((parse_date(from)?, parse_date(to)?)),
            ),
            _ => PeriodResolver::resolve(&self.period, today, None),
        }
    }
}

/// Which record table, and whose records, a command reads
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Record table name
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Only records owned by this user
    #[arg(long)]
    pub user: Option<String>,
}

impl SourceArgs {
    pub fn filter(&self) -> RecordFilter {
        match &self.user {
            Some(user) => RecordFilter::new().for_user(user.clone()),
            None => RecordFilter::new(),
        }
    }
}

/// Parse a user-entered amount such as "1500" or "1,500.25"
pub fn parse_amount(input: &str) -> LedgerLensResult<Money> {
    Money::parse(input).map_err(|e| {
        LedgerLensError::Validation(format!(
            "Invalid amount: '{}'. Use a format like '1500' or '1500.00'. Error: {}",
            input, e
        ))
    })
}

/// Parse an optional date argument, falling back to `today`
pub fn date_or_today(input: Option<&str>, today: NaiveDate) -> LedgerLensResult<NaiveDate> {
    input.map(parse_date).transpose().map(|d| d.unwrap_or(today))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_args_custom_range_wins() {
        let args = PeriodArgs {
            period: "last-year".into(),
            from: Some("2025-02-01".into()),
            to: Some("2025-02-10".into()),
        };
        let window = args.resolve(date(2025, 6, 1)).unwrap();
        assert_eq!(window.start, date(2025, 2, 1));
        assert_eq!(window.end, date(2025, 2, 10));
    }

    #[test]
    fn test_period_args_named() {
        let args = PeriodArgs {
            period: "last-month".into(),
            from: None,
            to: None,
        };
        let window = args.resolve(date(2025, 3, 15)).unwrap();
        assert_eq!(window.start, date(2025, 2, 1));
        assert_eq!(window.end, date(2025, 2, 28));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount("12.50").unwrap(), Money::from_cents(1250));
        assert!(parse_amount("twelve").unwrap_err().is_validation());
    }

    #[test]
    fn test_date_or_today() {
        let today = date(2025, 1, 1);
        assert_eq!(date_or_today(None, today).unwrap(), today);
        assert_eq!(
            date_or_today(Some("2024-12-31"), today).unwrap(),
            date(2024, 12, 31)
        );
    }
}
