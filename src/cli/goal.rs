//! Savings goal CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use super::parse_amount;
use crate::error::{LedgerLensError, LedgerLensResult};
use crate::models::window::parse_date;
use crate::models::SavingsGoal;
use crate::services::progress::savings_progress;
use crate::storage::Storage;

/// Savings goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Add {
        /// Goal name
        name: String,
        /// Target amount
        target: String,
        /// Amount already saved
        #[arg(short, long)]
        saved: Option<String>,
        /// Target date (YYYY-MM-DD)
        #[arg(short, long)]
        by: Option<String>,
    },
    /// List savings goals
    List,
    /// Add a contribution to a goal
    Contribute {
        /// Goal name or ID
        goal: String,
        /// Amount contributed
        amount: String,
    },
}

/// Handle a savings goal command
pub fn handle_goal_command(
    storage: &Storage,
    today: NaiveDate,
    cmd: GoalCommands,
) -> LedgerLensResult<()> {
    match cmd {
        GoalCommands::Add {
            name,
            target,
            saved,
            by,
        } => {
            let target = parse_amount(&target)?;
            if !target.is_positive() {
                return Err(LedgerLensError::Validation(
                    "Target amount must be greater than zero".into(),
                ));
            }

            let mut goal = SavingsGoal::new(name, target);
            if let Some(saved) = saved {
                goal = goal.with_current(parse_amount(&saved)?);
            }
            if let Some(by) = by {
                goal = goal.with_target_date(parse_date(&by)?);
            }

            println!("Created savings goal: {}", goal.name);
            println!("  Target: {}", goal.target_amount);
            if let Some(date) = goal.target_date {
                println!("  By:     {}", date);
            }
            let id = storage.goals.add(goal)?;
            println!("  ID: {}", id.short());
        }

        GoalCommands::List => {
            let goals = storage.goals.all()?;
            if goals.is_empty() {
                println!("No savings goals defined.");
                return Ok(());
            }

            println!(
                "{:12} {:<24} {:>12} {:>12} {:>8} {:>10}",
                "ID", "Name", "Target", "Saved", "%", "Days left"
            );
            println!("{}", "-".repeat(83));
            for goal in &goals {
                let progress = savings_progress(goal, today);
                println!(
                    "{:12} {:<24} {:>12} {:>12} {:>7.1}% {:>10}",
                    goal.id.short(),
                    goal.name,
                    goal.target_amount,
                    goal.current_amount,
                    progress.progress.percentage,
                    progress
                        .days_remaining
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".into())
                );
            }
        }

        GoalCommands::Contribute { goal, amount } => {
            let amount = parse_amount(&amount)?;
            let mut found = storage
                .goals
                .find(&goal)?
                .ok_or_else(|| LedgerLensError::goal_not_found(&goal))?;

            found.contribute(amount);
            let progress = savings_progress(&found, today);
            println!(
                "Contributed {} to {}: {} of {} ({:.1}%)",
                amount,
                found.name,
                found.current_amount,
                found.target_amount,
                progress.progress.percentage
            );
            storage.goals.replace(found)?;
        }
    }

    Ok(())
}
