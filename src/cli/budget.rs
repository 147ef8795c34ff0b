//! Budget CLI commands
//!
//! Budgets are category allowances; `report budgets` shows progress against them.

use clap::Subcommand;

use super::parse_amount;
use crate::error::{LedgerLensError, LedgerLensResult};
use crate::models::Budget;
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a budget for an expense category
    Add {
        /// Budget name
        name: String,
        /// Allocated amount per period (e.g., "2000" or "2000.00")
        allocated: String,
        /// Expense category tracked by this budget; defaults to the name
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List all budgets
    List,
    /// Remove a budget
    Remove {
        /// Budget name or ID
        budget: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(storage: &Storage, cmd: BudgetCommands) -> LedgerLensResult<()> {
    match cmd {
        BudgetCommands::Add {
            name,
            allocated,
            category,
        } => {
            let allocated = parse_amount(&allocated)?;
            if allocated.is_negative() {
                return Err(LedgerLensError::Validation(
                    "Allocated amount must not be negative".into(),
                ));
            }
            if storage.budgets.find(&name)?.is_some() {
                return Err(LedgerLensError::Validation(format!(
                    "A budget named '{}' already exists",
                    name
                )));
            }

            let category = category.unwrap_or_else(|| name.clone());
            let budget = Budget::new(name, category, allocated);
            println!("Created budget: {}", budget.name);
            println!("  Category:  {}", budget.category);
            println!("  Allocated: {}", budget.allocated);
            let id = storage.budgets.add(budget)?;
            println!("  ID: {}", id.short());
        }

        BudgetCommands::List => {
            let budgets = storage.budgets.all()?;
            if budgets.is_empty() {
                println!("No budgets defined.");
                return Ok(());
            }

            println!("{:12} {:<24} {:<20} {:>12}", "ID", "Name", "Category", "Allocated");
            println!("{}", "-".repeat(71));
            for budget in &budgets {
                println!(
                    "{:12} {:<24} {:<20} {:>12}",
                    budget.id.short(),
                    budget.name,
                    budget.category,
                    budget.allocated
                );
            }
        }

        BudgetCommands::Remove { budget } => {
            let removed = storage
                .budgets
                .remove(&budget)?
                .ok_or_else(|| LedgerLensError::budget_not_found(&budget))?;
            println!("Removed budget: {}", removed.name);
        }
    }

    Ok(())
}
