//! Ledgerkeep - personal finance ledger core
//!
//! Tracks accounts, income/expense transactions, and categories for any
//! number of owners, with one hard guarantee: every account's cached
//! `balance` always equals the signed sum of its transaction history, even
//! under concurrent edits, moves, and deletions.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: Core data models (accounts, transactions, categories, money)
//! - `reconcile`: Pure balance derivation and delta computation
//! - `store`: The persistence interface and its in-memory and JSON-file
//!   implementations; all writes go through atomic batches
//! - `services`: Business logic - the transaction service couples every
//!   record write to its balance adjustments, the account service carries
//!   the audit/repair path
//! - `reports`: Stateless monthly summaries and category breakdowns
//! - `advice`: Best-effort AI commentary over the ledger
//! - `config`: Path and settings management for the CLI binary
//! - `cli`: clap command handlers
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use ledgerkeep::models::{system_category, Money, OwnerId, TransactionKind};
//! use ledgerkeep::services::{AccountService, CreateAccount, CreateTransaction, TransactionService};
//! use ledgerkeep::store::{LedgerStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let owner_id = OwnerId::new();
//!
//! let account = AccountService::new(&store)
//!     .create(CreateAccount {
//!         owner_id,
//!         name: "Checking".into(),
//!         currency: "TWD".into(),
//!         color: "#0ea5e9".into(),
//!     })
//!     .unwrap();
//!
//! let transactions = TransactionService::new(&store);
//! transactions
//!     .create(CreateTransaction {
//!         id: None,
//!         owner_id,
//!         account_id: account.id,
//!         kind: TransactionKind::Income,
//!         amount: Money::from_major(1_000),
//!         category_id: system_category("Salary").unwrap().id,
//!         date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
//!         note: "payday".into(),
//!     })
//!     .unwrap();
//!
//! let account = store.account(owner_id, account.id).unwrap().unwrap();
//! assert_eq!(account.balance, Money::from_major(1_000));
//! ```

pub mod advice;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod reconcile;
pub mod reports;
pub mod services;
pub mod store;

pub use error::{LedgerError, LedgerResult};
