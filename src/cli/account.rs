//! Account management commands

use anyhow::Result;
use clap::Subcommand;

use crate::config::Settings;
use crate::services::{AccountService, CreateAccount, UpdateAccount};
use crate::store::LedgerStore;

use super::resolve_account;

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Add a new account
    Add {
        /// Account name
        name: String,

        /// Currency code (defaults to the configured currency)
        #[arg(long)]
        currency: Option<String>,

        /// Display color
        #[arg(long, default_value = "#0ea5e9")]
        color: String,
    },

    /// List accounts with their balances
    List,

    /// Rename an account
    Rename {
        /// Account name or ID
        account: String,

        /// New name
        name: String,
    },

    /// Remove an account (its transaction history is retained)
    Remove {
        /// Account name or ID
        account: String,
    },
}

pub fn handle_account_command<S: LedgerStore + ?Sized>(
    store: &S,
    settings: &Settings,
    command: AccountCommands,
) -> Result<()> {
    let service = AccountService::new(store);
    let owner_id = settings.owner_id;

    match command {
        AccountCommands::Add {
            name,
            currency,
            color,
        } => {
            let account = service.create(CreateAccount {
                owner_id,
                name,
                currency: currency.unwrap_or_else(|| settings.currency.clone()),
                color,
            })?;
            println!("Created account {} ({})", account.name, account.id);
        }
        AccountCommands::List => {
            let accounts = service.list(owner_id)?;
            if accounts.is_empty() {
                println!("No accounts yet. Add one with `ledgerkeep account add <name>`.");
                return Ok(());
            }
            for account in accounts {
                println!(
                    "{}  {:<24} {} {:>14}",
                    account.id, account.name, account.currency, account.balance.to_string()
                );
            }
        }
        AccountCommands::Rename { account, name } => {
            let target = resolve_account(store, owner_id, &account)?;
            let updated = service.update(
                owner_id,
                target.id,
                UpdateAccount {
                    name: Some(name),
                    ..Default::default()
                },
            )?;
            println!("Renamed {} to {}", target.name, updated.name);
        }
        AccountCommands::Remove { account } => {
            let target = resolve_account(store, owner_id, &account)?;
            service.delete(owner_id, target.id)?;
            println!("Removed account {} (history retained)", target.name);
        }
    }

    Ok(())
}
