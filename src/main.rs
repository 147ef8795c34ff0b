use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use ledgerlens::cli::{
    handle_budget_command, handle_client_command, handle_goal_command, handle_record_command,
    handle_report_command, handle_tax_command, PeriodArgs,
};
use ledgerlens::config::{paths::LedgerLensPaths, settings::Settings};
use ledgerlens::models::window::parse_date;
use ledgerlens::models::TaxSchedule;
use ledgerlens::storage::Storage;

#[derive(Parser)]
#[command(
    name = "ledgerlens",
    version,
    about = "Period aggregation, progressive tax and KPI engine for small-business finances",
    long_about = "LedgerLens turns dated income, expense and tax records into the figures a \
                  business dashboard shows: period totals and growth, margins, progressive \
                  income tax, KPI status, and budget or savings progress."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Evaluate relative periods against this date instead of the clock (YYYY-MM-DD)
    #[arg(long, global = true, env = "LEDGERLENS_TODAY")]
    today: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and write a default config
    Init,

    /// Show configuration and paths, or update settings
    Config {
        /// Load a tax bracket table (.json, .yaml or .yml) into the config
        #[arg(long)]
        tax_schedule: Option<PathBuf>,
        /// Currency symbol used in reports
        #[arg(long)]
        currency: Option<String>,
    },

    /// Resolve a period name to its date window
    Period {
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Monetary record commands
    #[command(subcommand, alias = "rec")]
    Record(ledgerlens::cli::RecordCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(ledgerlens::cli::BudgetCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(ledgerlens::cli::GoalCommands),

    /// Client commands
    #[command(subcommand)]
    Client(ledgerlens::cli::ClientCommands),

    /// Tax calculations
    #[command(subcommand)]
    Tax(ledgerlens::cli::TaxCommands),

    /// Reports
    #[command(subcommand)]
    Report(ledgerlens::cli::ReportCommands),
}

fn resolve_today(today: Option<&str>) -> Result<NaiveDate> {
    match today {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ledgerlens::init_tracing(cli.verbose);

    let today = resolve_today(cli.today.as_deref())?;

    // Initialize paths and settings
    let paths = LedgerLensPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing LedgerLens at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Config file:    {}", paths.settings_file().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!();
            println!("Run 'ledgerlens record add --help' to start adding records.");
        }
        Some(Commands::Config {
            tax_schedule,
            currency,
        }) => {
            let changed = tax_schedule.is_some() || currency.is_some();
            if let Some(path) = tax_schedule {
                settings.tax_schedule = TaxSchedule::load(&path)?;
            }
            if let Some(symbol) = currency {
                settings.currency_symbol = symbol;
            }
            if changed {
                settings.validate()?;
                settings.save(&paths)?;
                println!("Settings updated.");
                println!();
            }

            println!("LedgerLens Configuration");
            println!("========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Config file:    {}", paths.settings_file().display());
            println!("Initialized:    {}", if storage.is_initialized() { "yes" } else { "no" });
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!(
                "  Tax schedule:     {} ({} brackets)",
                settings.tax_schedule.name,
                settings.tax_schedule.brackets.len()
            );
            println!(
                "  Quarterly rule:   {} above {}",
                settings.quarterly_estimate.rate, settings.quarterly_estimate.threshold
            );
            println!("  KPI targets:      {}", settings.kpi_targets.len());
            println!(
                "  Progress bands:   near > {}%, over > {}%",
                settings.progress.near_limit_pct, settings.progress.over_pct
            );
            println!("  Trend months:     {}", settings.trend_months);
        }
        Some(Commands::Period { period }) => {
            let window = period.resolve(today)?;
            println!("Window:   {} ({} days)", window, window.span_days());
            println!("Previous: {}", window.previous()?);
        }
        Some(Commands::Record(cmd)) => handle_record_command(&storage, today, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, cmd)?,
        Some(Commands::Goal(cmd)) => handle_goal_command(&storage, today, cmd)?,
        Some(Commands::Client(cmd)) => handle_client_command(&storage, today, cmd)?,
        Some(Commands::Tax(cmd)) => handle_tax_command(&settings, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, today, cmd)?,
        None => {
            println!("LedgerLens - financial aggregation and tax engine");
            println!();
            println!("Run 'ledgerlens --help' for usage information.");
        }
    }

    Ok(())
}
