//! Ledger store
//!
//! The narrow persistence interface the rest of the crate talks to. A store
//! holds accounts, transactions, and categories keyed by owner, and executes
//! write batches atomically: every batch either applies in full or leaves
//! the store untouched. Account writes can be conditioned on a version
//! stamp, which is how concurrent balance updates serialize.

pub mod file_io;
pub mod json;
pub mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    system_defaults, Account, AccountId, Category, CategoryId, CategoryOwner, OwnerId,
    Transaction, TransactionId,
};

/// Errors surfaced by a ledger store
#[derive(Error, Debug)]
pub enum StoreError {
    /// A conditioned account write found a different version than expected
    #[error("account {account} version conflict: expected {expected}, found {found}")]
    VersionMismatch {
        account: AccountId,
        expected: u64,
        found: u64,
    },

    /// The batch contained an invalid op; nothing was applied
    #[error("batch rejected: {0}")]
    Rejected(String),

    /// The backing store could not be reached or written
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A single write in an atomic batch
#[derive(Debug, Clone)]
pub enum WriteOp {
    /// Insert or replace an account
    ///
    /// With `expected_version: Some(v)` the write only succeeds if the
    /// stored account currently has version `v`, and the store bumps the
    /// version to `v + 1`. With `None` the write is unconditional (used at
    /// creation and seeding); the stored version still only moves forward.
    PutAccount {
        account: Account,
        expected_version: Option<u64>,
    },
    /// Remove an account; its transaction history is retained
    DeleteAccount { owner_id: OwnerId, id: AccountId },
    /// Insert or replace a transaction
    PutTransaction(Transaction),
    /// Remove a transaction
    DeleteTransaction {
        owner_id: OwnerId,
        id: TransactionId,
    },
    /// Insert or replace an owner-created category
    PutCategory(Category),
    /// Remove an owner-created category
    DeleteCategory { owner_id: OwnerId, id: CategoryId },
}

/// Persistent mapping of accounts, transactions, and categories
///
/// Reads are scoped to one owner. `categories` merges the fixed system
/// defaults with the owner's custom categories. All writes go through
/// `run_atomic`; the single-entity helpers are one-op batches.
pub trait LedgerStore: Send + Sync {
    fn accounts(&self, owner_id: OwnerId) -> Result<Vec<Account>, StoreError>;
    fn account(&self, owner_id: OwnerId, id: AccountId) -> Result<Option<Account>, StoreError>;
    fn transactions(&self, owner_id: OwnerId) -> Result<Vec<Transaction>, StoreError>;
    fn transaction(
        &self,
        owner_id: OwnerId,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError>;
    fn categories(&self, owner_id: OwnerId) -> Result<Vec<Category>, StoreError>;

    /// Execute a batch of writes as one all-or-nothing unit
    fn run_atomic(&self, ops: Vec<WriteOp>) -> Result<(), StoreError>;

    fn upsert_account(&self, account: Account) -> Result<(), StoreError> {
        self.run_atomic(vec![WriteOp::PutAccount {
            account,
            expected_version: None,
        }])
    }

    fn delete_account(&self, owner_id: OwnerId, id: AccountId) -> Result<(), StoreError> {
        self.run_atomic(vec![WriteOp::DeleteAccount { owner_id, id }])
    }

    fn upsert_transaction(&self, transaction: Transaction) -> Result<(), StoreError> {
        self.run_atomic(vec![WriteOp::PutTransaction(transaction)])
    }

    fn delete_transaction(
        &self,
        owner_id: OwnerId,
        id: TransactionId,
    ) -> Result<(), StoreError> {
        self.run_atomic(vec![WriteOp::DeleteTransaction { owner_id, id }])
    }

    fn upsert_category(&self, category: Category) -> Result<(), StoreError> {
        self.run_atomic(vec![WriteOp::PutCategory(category)])
    }

    fn delete_category(&self, owner_id: OwnerId, id: CategoryId) -> Result<(), StoreError> {
        self.run_atomic(vec![WriteOp::DeleteCategory { owner_id, id }])
    }
}

/// In-memory ledger state shared by the store implementations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct LedgerState {
    accounts: HashMap<AccountId, Account>,
    transactions: HashMap<TransactionId, Transaction>,
    categories: HashMap<CategoryId, Category>,
}

impl LedgerState {
    pub(crate) fn accounts_for(&self, owner_id: OwnerId) -> Vec<Account> {
        let mut accounts: Vec<_> = self
            .accounts
            .values()
            .filter(|a| a.owner_id == owner_id)
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        accounts
    }

    pub(crate) fn account(&self, owner_id: OwnerId, id: AccountId) -> Option<Account> {
        self.accounts
            .get(&id)
            .filter(|a| a.owner_id == owner_id)
            .cloned()
    }

    pub(crate) fn transactions_for(&self, owner_id: OwnerId) -> Vec<Transaction> {
        let mut transactions: Vec<_> = self
            .transactions
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        transactions
    }

    pub(crate) fn transaction(
        &self,
        owner_id: OwnerId,
        id: TransactionId,
    ) -> Option<Transaction> {
        self.transactions
            .get(&id)
            .filter(|t| t.owner_id == owner_id)
            .cloned()
    }

    pub(crate) fn categories_for(&self, owner_id: OwnerId) -> Vec<Category> {
        let mut merged = system_defaults();
        let mut custom: Vec<_> = self
            .categories
            .values()
            .filter(|c| c.visible_to(owner_id) && !c.is_system())
            .cloned()
            .collect();
        custom.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        merged.extend(custom);
        merged
    }

    /// Apply one op, validating it against the current state
    pub(crate) fn apply(&mut self, op: &WriteOp) -> Result<(), StoreError> {
        match op {
            WriteOp::PutAccount {
                account,
                expected_version,
            } => {
                let existing = self.accounts.get(&account.id);
                if let Some(existing) = existing {
                    if existing.owner_id != account.owner_id {
                        return Err(StoreError::Rejected(format!(
                            "account {} belongs to a different owner",
                            account.id
                        )));
                    }
                }
                let mut stored = account.clone();
                match (expected_version, existing) {
                    (Some(expected), Some(existing)) => {
                        if existing.version != *expected {
                            return Err(StoreError::VersionMismatch {
                                account: account.id,
                                expected: *expected,
                                found: existing.version,
                            });
                        }
                        stored.version = expected + 1;
                    }
                    (Some(_), None) => {
                        return Err(StoreError::Rejected(format!(
                            "conditioned write against missing account {}",
                            account.id
                        )));
                    }
                    (None, Some(existing)) => {
                        // Version only moves forward, so racing conditioned
                        // writers still detect the overwrite.
                        stored.version = existing.version + 1;
                    }
                    (None, None) => {}
                }
                self.accounts.insert(stored.id, stored);
                Ok(())
            }
            WriteOp::DeleteAccount { owner_id, id } => {
                let owned = self
                    .accounts
                    .get(id)
                    .is_some_and(|a| a.owner_id == *owner_id);
                if !owned {
                    return Err(StoreError::Rejected(format!("unknown account {}", id)));
                }
                self.accounts.remove(id);
                Ok(())
            }
            WriteOp::PutTransaction(transaction) => {
                if let Some(existing) = self.transactions.get(&transaction.id) {
                    if existing.owner_id != transaction.owner_id {
                        return Err(StoreError::Rejected(format!(
                            "transaction {} belongs to a different owner",
                            transaction.id
                        )));
                    }
                }
                self.transactions
                    .insert(transaction.id, transaction.clone());
                Ok(())
            }
            WriteOp::DeleteTransaction { owner_id, id } => {
                let owned = self
                    .transactions
                    .get(id)
                    .is_some_and(|t| t.owner_id == *owner_id);
                if !owned {
                    return Err(StoreError::Rejected(format!("unknown transaction {}", id)));
                }
                self.transactions.remove(id);
                Ok(())
            }
            WriteOp::PutCategory(category) => {
                if category.owner == CategoryOwner::System {
                    return Err(StoreError::Rejected(
                        "system categories are fixed and cannot be written".into(),
                    ));
                }
                if let Some(existing) = self.categories.get(&category.id) {
                    if existing.owner != category.owner {
                        return Err(StoreError::Rejected(format!(
                            "category {} belongs to a different owner",
                            category.id
                        )));
                    }
                }
                self.categories.insert(category.id, category.clone());
                Ok(())
            }
            WriteOp::DeleteCategory { owner_id, id } => {
                let owned = self
                    .categories
                    .get(id)
                    .is_some_and(|c| c.owner == CategoryOwner::User(*owner_id));
                if !owned {
                    return Err(StoreError::Rejected(format!("unknown category {}", id)));
                }
                self.categories.remove(id);
                Ok(())
            }
        }
    }
}
