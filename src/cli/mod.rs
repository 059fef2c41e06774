//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer. Accounts and
//! categories can be referenced by id or by (case-insensitive) name.

pub mod account;
pub mod maintenance;
pub mod report;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use maintenance::{handle_advise, handle_audit, handle_seed_demo};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use crate::models::{Account, AccountId, Category, CategoryId, OwnerId, TransactionKind};
use crate::services::{AccountService, CategoryService};
use crate::store::LedgerStore;

pub(crate) fn resolve_account<S: LedgerStore + ?Sized>(
    store: &S,
    owner_id: OwnerId,
    needle: &str,
) -> Result<Account> {
    let accounts = AccountService::new(store).list(owner_id)?;
    if let Ok(id) = needle.parse::<AccountId>() {
        if let Some(account) = accounts.iter().find(|a| a.id == id) {
            return Ok(account.clone());
        }
    }
    accounts
        .into_iter()
        .find(|a| a.name.eq_ignore_ascii_case(needle))
        .ok_or_else(|| anyhow!("No account matches '{}'", needle))
}

pub(crate) fn resolve_category<S: LedgerStore + ?Sized>(
    store: &S,
    owner_id: OwnerId,
    needle: &str,
) -> Result<Category> {
    let categories = CategoryService::new(store).list(owner_id)?;
    if let Ok(id) = needle.parse::<CategoryId>() {
        if let Some(category) = categories.iter().find(|c| c.id == id) {
            return Ok(category.clone());
        }
    }
    categories
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(needle))
        .ok_or_else(|| anyhow!("No category matches '{}'", needle))
}

pub(crate) fn parse_kind(s: &str) -> Result<TransactionKind> {
    TransactionKind::parse(s)
        .ok_or_else(|| anyhow!("Unknown transaction kind '{}' (income or expense)", s))
}

pub(crate) fn parse_date(s: Option<&str>) -> Result<NaiveDate> {
    match s {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| anyhow!("Invalid date '{}': {}", s, e)),
        None => Ok(chrono::Local::now().date_naive()),
    }
}
