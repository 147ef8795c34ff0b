//! Client CLI commands
//!
//! Clients only carry an onboarding date; retention is derived from it.

use chrono::NaiveDate;
use clap::Subcommand;

use super::date_or_today;
use crate::error::LedgerLensResult;
use crate::models::Client;
use crate::storage::Storage;

/// Client subcommands
#[derive(Subcommand)]
pub enum ClientCommands {
    /// Add a client
    Add {
        /// Client name
        name: String,
        /// Onboarding date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        since: Option<String>,
    },
    /// List clients
    List,
}

pub fn handle_client_command(
    storage: &Storage,
    today: NaiveDate,
    cmd: ClientCommands,
) -> LedgerLensResult<()> {
    match cmd {
        ClientCommands::Add { name, since } => {
            let client = Client::new(name, date_or_today(since.as_deref(), today)?);
            println!("Added client: {} (since {})", client.name, client.created_on);
            let id = storage.clients.add(client)?;
            println!("  ID: {}", id.short());
        }

        ClientCommands::List => {
            let mut clients = storage.clients.all()?;
            if clients.is_empty() {
                println!("No clients found.");
                return Ok(());
            }
            clients.sort_by_key(|c| c.created_on);

            println!("{:12} {:<32} {}", "ID", "Name", "Since");
            println!("{}", "-".repeat(56));
            for client in &clients {
                println!("{:12} {:<32} {}", client.id.short(), client.name, client.created_on);
            }
            println!("\n{} client(s)", clients.len());
        }
    }

    Ok(())
}
