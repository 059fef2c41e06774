//! Transaction management commands

use anyhow::{anyhow, Result};
use clap::Subcommand;

use crate::config::Settings;
use crate::models::{resolve_category_name, Money, TransactionId};
use crate::services::{CategoryService, CreateTransaction, TransactionService, UpdateTransaction};
use crate::store::LedgerStore;

use super::{parse_date, parse_kind, resolve_account, resolve_category};

#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// Account name or ID
        account: String,

        /// income or expense
        kind: String,

        /// Amount, e.g. 12.50
        amount: String,

        /// Category name or ID
        category: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        /// Free-form note
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,

        /// Move to another account (name or ID)
        #[arg(long)]
        account: Option<String>,

        /// Change the kind (income or expense)
        #[arg(long)]
        kind: Option<String>,

        /// Change the amount
        #[arg(long)]
        amount: Option<String>,

        /// Change the category (name or ID)
        #[arg(long)]
        category: Option<String>,

        /// Change the date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Change the note
        #[arg(long)]
        note: Option<String>,
    },

    /// Remove a transaction
    Remove {
        /// Transaction ID
        id: String,
    },

    /// List transactions, most recent first
    List {
        /// Show at most this many
        #[arg(long)]
        limit: Option<usize>,
    },
}

pub fn handle_transaction_command<S: LedgerStore + ?Sized>(
    store: &S,
    settings: &Settings,
    command: TransactionCommands,
) -> Result<()> {
    let service = TransactionService::new(store);
    let owner_id = settings.owner_id;

    match command {
        TransactionCommands::Add {
            account,
            kind,
            amount,
            category,
            date,
            note,
        } => {
            let account = resolve_account(store, owner_id, &account)?;
            let category = resolve_category(store, owner_id, &category)?;
            let txn = service.create(CreateTransaction {
                id: None,
                owner_id,
                account_id: account.id,
                kind: parse_kind(&kind)?,
                amount: Money::parse(&amount).map_err(|e| anyhow!("{}", e))?,
                category_id: category.id,
                date: parse_date(date.as_deref())?,
                note,
            })?;
            println!("Recorded {} ({})", txn, txn.id);
        }
        TransactionCommands::Edit {
            id,
            account,
            kind,
            amount,
            category,
            date,
            note,
        } => {
            let id: TransactionId = id
                .parse()
                .map_err(|_| anyhow!("Invalid transaction id '{}'", id))?;

            let mut patch = UpdateTransaction::default();
            if let Some(needle) = account {
                patch.account_id = Some(resolve_account(store, owner_id, &needle)?.id);
            }
            if let Some(kind) = kind {
                patch.kind = Some(parse_kind(&kind)?);
            }
            if let Some(amount) = amount {
                patch.amount = Some(Money::parse(&amount).map_err(|e| anyhow!("{}", e))?);
            }
            if let Some(needle) = category {
                patch.category_id = Some(resolve_category(store, owner_id, &needle)?.id);
            }
            if let Some(date) = date {
                patch.date = Some(parse_date(Some(&date))?);
            }
            patch.note = note;

            let txn = service.update(owner_id, id, patch)?;
            println!("Updated {} ({})", txn, txn.id);
        }
        TransactionCommands::Remove { id } => {
            let id: TransactionId = id
                .parse()
                .map_err(|_| anyhow!("Invalid transaction id '{}'", id))?;
            let txn = service.delete(owner_id, id)?;
            println!("Removed {} ({})", txn, txn.id);
        }
        TransactionCommands::List { limit } => {
            let categories = CategoryService::new(store).list(owner_id)?;
            let mut transactions = service.list(owner_id)?;
            if let Some(limit) = limit {
                transactions.truncate(limit);
            }
            if transactions.is_empty() {
                println!("No transactions yet.");
                return Ok(());
            }
            for txn in transactions {
                println!(
                    "{}  {}  {:<7} {:>12}  {:<16} {}",
                    txn.id,
                    txn.date.format("%Y-%m-%d"),
                    txn.kind.to_string(),
                    txn.amount.to_string(),
                    resolve_category_name(&categories, txn.category_id),
                    txn.note
                );
            }
        }
    }

    Ok(())
}
