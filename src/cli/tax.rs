//! Tax CLI commands
//!
//! One-off tax calculations against the configured (or a given) schedule.

use clap::Subcommand;
use std::path::PathBuf;

use super::parse_amount;
use crate::config::settings::Settings;
use crate::display::format_percentage;
use crate::error::{LedgerLensError, LedgerLensResult};
use crate::export::export_report;
use crate::models::{QuarterlyEstimate, QuarterlyEstimateRule, TaxResult, TaxSchedule};
use crate::services::tax::{compute_tax, quarterly_estimate, TaxMode};

/// Tax subcommands
#[derive(Subcommand)]
pub enum TaxCommands {
    /// Compute tax on an income
    Compute {
        /// Taxable income (e.g., "1500000")
        income: String,
        /// marginal (annual bracket table) or quarterly-estimate (flat rule)
        #[arg(short, long, default_value = "marginal")]
        mode: TaxMode,
        /// Bracket table file (.json, .yaml or .yml) instead of the configured one
        #[arg(short, long)]
        schedule: Option<PathBuf>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Flat quarterly estimate: max(0, income - threshold) * rate
    Estimate {
        /// Quarterly taxable income
        income: String,
        /// Threshold below which nothing is owed; defaults to the configured rule
        #[arg(short, long)]
        threshold: Option<String>,
        /// Rate in [0, 1]; defaults to the configured rule
        #[arg(short, long)]
        rate: Option<f64>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn print_json<T: serde::Serialize>(report_type: &str, value: &T) -> LedgerLensResult<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    export_report(report_type, value, &mut handle, true)
}

fn print_tax_result(schedule: &TaxSchedule, result: &TaxResult) {
    println!("Tax on {} ({})", result.taxable_income, schedule.name);
    println!("{}", "=".repeat(60));
    for share in &result.breakdown {
        let upper = share
            .upper_bound
            .map(|u| u.to_string())
            .unwrap_or_else(|| "and above".to_string());
        println!(
            "  {:>12} - {:<12} {:>6}  on {:>14} = {:>12}",
            share.lower_bound,
            upper,
            format_percentage(share.rate * 100.0),
            share.taxable_amount,
            share.tax
        );
    }
    println!("{}", "-".repeat(60));
    println!("Liability:      {}", result.liability);
    println!("Effective rate: {}", format_percentage(result.effective_rate_pct));
    println!("Marginal rate:  {}", format_percentage(result.marginal_rate * 100.0));
}

fn print_estimate(estimate: &QuarterlyEstimate) {
    println!("Quarterly estimate on {}", estimate.income);
    println!("  Threshold: {}", estimate.threshold);
    println!("  Rate:      {}", format_percentage(estimate.rate * 100.0));
    println!("  Estimate:  {}", estimate.estimate);
}

/// Handle a tax command
pub fn handle_tax_command(settings: &Settings, cmd: TaxCommands) -> LedgerLensResult<()> {
    match cmd {
        TaxCommands::Compute {
            income,
            mode,
            schedule,
            json,
        } => {
            let income = parse_amount(&income)?;
            match mode {
                TaxMode::Marginal => {
                    let schedule = match schedule {
                        Some(path) => TaxSchedule::load(&path)?,
                        None => settings.tax_schedule.clone(),
                    };
                    let result = compute_tax(income, &schedule)?;
                    if json {
                        print_json("tax", &result)?;
                    } else {
                        print_tax_result(&schedule, &result);
                    }
                }
                TaxMode::QuarterlyEstimate => {
                    if schedule.is_some() {
                        return Err(LedgerLensError::Validation(
                            "--schedule only applies to the marginal mode".into(),
                        ));
                    }
                    let estimate = quarterly_estimate(income, &settings.quarterly_estimate)?;
                    if json {
                        print_json("quarterly-estimate", &estimate)?;
                    } else {
                        print_estimate(&estimate);
                    }
                }
            }
        }

        TaxCommands::Estimate {
            income,
            threshold,
            rate,
            json,
        } => {
            let income = parse_amount(&income)?;
            let rule = QuarterlyEstimateRule {
                threshold: match threshold {
                    Some(t) => parse_amount(&t)?,
                    None => settings.quarterly_estimate.threshold,
                },
                rate: rate.unwrap_or(settings.quarterly_estimate.rate),
            };
            let estimate = quarterly_estimate(income, &rule)?;
            if json {
                print_json("quarterly-estimate", &estimate)?;
            } else {
                print_estimate(&estimate);
            }
        }
    }

    Ok(())
}
