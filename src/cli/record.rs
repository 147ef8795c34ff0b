//! Monetary record CLI commands
//!
//! Add, list, delete and import the dated records every report reads.

use chrono::NaiveDate;
use clap::Subcommand;
use std::path::PathBuf;

use super::{date_or_today, parse_amount, PeriodArgs, SourceArgs};
use crate::display::format_record_list;
use crate::error::{LedgerLensError, LedgerLensResult};
use crate::export::export_records_csv;
use crate::models::{MonetaryRecord, RecordKind, RecordStatus};
use crate::storage::{RecordStore, Storage};

/// Record subcommands
#[derive(Subcommand)]
pub enum RecordCommands {
    /// Add a record
    Add {
        /// Amount (e.g., "1500" or "1500.00"); always positive, the kind gives direction
        amount: String,
        /// Record kind (income, expense, credit, debit, tax_liability)
        #[arg(short, long, default_value = "income")]
        kind: String,
        /// Date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Category
        #[arg(short, long)]
        category: Option<String>,
        /// Status (draft, pending, paid, overdue, cancelled)
        #[arg(short, long)]
        status: Option<String>,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// Client the record belongs to
        #[arg(long)]
        client: Option<String>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List records in a period
    List {
        #[command(flatten)]
        period: PeriodArgs,
        /// Only this kind
        #[arg(short, long)]
        kind: Option<String>,
        /// Only this status
        #[arg(short, long)]
        status: Option<String>,
        /// Show at most this many (most recent)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Print CSV instead of a table
        #[arg(long)]
        csv: bool,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Delete a record by ID
    Delete {
        /// Record ID (short form or prefix)
        id: String,
        /// Record table name
        #[arg(long, default_value = crate::storage::DEFAULT_TABLE)]
        table: String,
    },
    /// Import records from a CSV file
    Import {
        /// Path to CSV file
        file: PathBuf,
        /// Date format of the file (e.g., "%m/%d/%Y")
        #[arg(long)]
        date_format: Option<String>,
        /// Field delimiter
        #[arg(long, default_value_t = ',')]
        delimiter: char,
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn parse_kind(input: &str) -> LedgerLensResult<RecordKind> {
    input.parse().map_err(LedgerLensError::Validation)
}

fn parse_status(input: &str) -> LedgerLensResult<RecordStatus> {
    input.parse().map_err(LedgerLensError::Validation)
}

/// Handle a record command
pub fn handle_record_command(
    storage: &Storage,
    today: NaiveDate,
    cmd: RecordCommands,
) -> LedgerLensResult<()> {
    match cmd {
        RecordCommands::Add {
            amount,
            kind,
            date,
            category,
            status,
            description,
            client,
            source,
        } => {
            let amount = parse_amount(&amount)?;
            if amount.is_negative() {
                return Err(LedgerLensError::Validation(
                    "Amount must not be negative; use --kind to set the direction".into(),
                ));
            }

            let mut record =
                MonetaryRecord::new(amount, date_or_today(date.as_deref(), today)?, parse_kind(&kind)?);
            if let Some(category) = category {
                record = record.with_category(category);
            }
            if let Some(status) = status {
                record = record.with_status(parse_status(&status)?);
            }
            if let Some(description) = description {
                record = record.with_description(description);
            }
            if let Some(client) = client {
                record = record.with_client(client);
            }
            if let Some(user) = source.user {
                record = record.with_user(user);
            }

            let summary = format!("{} {} on {}", record.kind, record.amount, record.occurred_on);
            let id = storage.records.insert(&source.table, record)?;
            println!("Added record: {}", summary);
            println!("  ID: {}", id.short());
        }

        RecordCommands::List {
            period,
            kind,
            status,
            limit,
            csv,
            source,
        } => {
            let window = period.resolve(today)?;
            let mut filter = source.filter().within(window);
            if let Some(kind) = kind {
                filter = filter.with_kind(parse_kind(&kind)?);
            }
            if let Some(status) = status {
                filter = filter.with_status(parse_status(&status)?);
            }

            let mut records = storage.records.fetch_records(&source.table, &filter)?;
            if let Some(limit) = limit {
                let skip = records.len().saturating_sub(limit);
                records.drain(..skip);
            }

            if csv {
                let stdout = std::io::stdout();
                export_records_csv(&records, stdout.lock())?;
            } else {
                println!("Records: {}", window);
                print!("{}", format_record_list(&records));
            }
        }

        RecordCommands::Delete { id, table } => {
            let found = storage
                .records
                .find(&table, &id)?
                .ok_or_else(|| LedgerLensError::record_not_found(&id))?;
            let removed = storage.records.delete(&table, found.id)?;
            println!(
                "Deleted record: {} {} on {}",
                removed.kind, removed.amount, removed.occurred_on
            );
        }

        RecordCommands::Import {
            file,
            date_format,
            delimiter,
            source,
        } => {
            super::handle_import_command(
                storage,
                &file,
                &source.table,
                source.user.as_deref(),
                date_format.as_deref(),
                delimiter,
            )?;
        }
    }

    Ok(())
}
