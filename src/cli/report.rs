//! CLI commands for reports
//!
//! Each command loads what its report needs from storage, generates it, and
//! hands it to `emit` for table, CSV or JSON output.

use chrono::{Datelike, NaiveDate};
use clap::Subcommand;

use super::{emit, OutputArgs, PeriodArgs, SourceArgs};
use crate::config::settings::Settings;
use crate::error::{LedgerLensError, LedgerLensResult};
use crate::models::MonetaryRecord;
use crate::reports::{
    BudgetOverviewReport, BusinessMetricsReport, SavingsReport, TaxReport, TrendReport,
};
use crate::services::aggregate::{Granularity, MAX_BUCKETS};
use crate::storage::{RecordStore, Storage};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Business metrics dashboard: revenue, margin, growth, receivables, KPIs
    #[command(alias = "dashboard")]
    Metrics {
        #[command(flatten)]
        period: PeriodArgs,
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Annual tax liability and quarterly estimates
    Tax {
        /// Calendar year; defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Spending against each budget
    #[command(alias = "budget")]
    Budgets {
        #[command(flatten)]
        period: PeriodArgs,
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Progress toward savings goals
    #[command(alias = "goals")]
    Savings {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Credit and debit totals per month or quarter
    Trend {
        /// Number of buckets; defaults to the configured trend length
        #[arg(short, long)]
        count: Option<usize>,
        /// month or quarter
        #[arg(short, long, default_value = "month")]
        granularity: Granularity,
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

fn load_records(storage: &Storage, source: &SourceArgs) -> LedgerLensResult<Vec<MonetaryRecord>> {
    storage.records.fetch_records(&source.table, &source.filter())
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    today: NaiveDate,
    cmd: ReportCommands,
) -> LedgerLensResult<()> {
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ReportCommands::Metrics {
            period,
            source,
            output,
        } => {
            let window = period.resolve(today)?;
            let records = load_records(storage, &source)?;
            let clients = storage.clients.all()?;
            let report = BusinessMetricsReport::generate(&records, &clients, window, settings)?;
            emit(&report, &output, currency)
        }

        ReportCommands::Tax {
            year,
            source,
            output,
        } => {
            let records = load_records(storage, &source)?;
            let report = TaxReport::generate(
                &records,
                year.unwrap_or_else(|| today.year()),
                &settings.tax_schedule,
                &settings.quarterly_estimate,
            )?;
            emit(&report, &output, currency)
        }

        ReportCommands::Budgets {
            period,
            source,
            output,
        } => {
            let window = period.resolve(today)?;
            let records = load_records(storage, &source)?;
            let budgets = storage.budgets.all()?;
            let report =
                BudgetOverviewReport::generate(&budgets, &records, window, &settings.progress);
            emit(&report, &output, currency)
        }

        ReportCommands::Savings { output } => {
            let goals = storage.goals.all()?;
            let report = SavingsReport::generate(&goals, today, &settings.progress);
            emit(&report, &output, currency)
        }

        ReportCommands::Trend {
            count,
            granularity,
            source,
            output,
        } => {
            let count = count.unwrap_or(settings.trend_months);
            if !(1..=MAX_BUCKETS).contains(&count) {
                return Err(LedgerLensError::Validation(format!(
                    "--count must be between 1 and {}",
                    MAX_BUCKETS
                )));
            }
            let records = load_records(storage, &source)?;
            let report = TrendReport::generate(&records, today, count, granularity)?;
            emit(&report, &output, currency)
        }
    }
}
