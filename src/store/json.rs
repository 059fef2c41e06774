//! JSON-file ledger store
//!
//! Persists the whole ledger state in a single `ledger.json` written with an
//! atomic temp-file-then-rename, so an atomic batch is exactly one file
//! replacement: a crash mid-batch leaves either the old file or the new one,
//! never a mix.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::file_io::{read_json, write_json_atomic};
use super::{LedgerState, LedgerStore, StoreError, WriteOp};
use crate::models::{Account, AccountId, Category, OwnerId, Transaction, TransactionId};

/// File-backed implementation of [`LedgerStore`]
pub struct JsonStore {
    path: PathBuf,
    state: RwLock<LedgerState>,
}

impl JsonStore {
    /// Open a store at the given file path, loading existing data if present
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state: LedgerState = read_json(&path)?;
        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    /// The file this store persists to
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, LedgerState>, StoreError> {
        self.state
            .read()
            .map_err(|e| StoreError::Unavailable(format!("Failed to acquire read lock: {}", e)))
    }
}

impl LedgerStore for JsonStore {
    fn accounts(&self, owner_id: OwnerId) -> Result<Vec<Account>, StoreError> {
        Ok(self.read()?.accounts_for(owner_id))
    }

    fn account(&self, owner_id: OwnerId, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.read()?.account(owner_id, id))
    }

    fn transactions(&self, owner_id: OwnerId) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.read()?.transactions_for(owner_id))
    }

    fn transaction(
        &self,
        owner_id: OwnerId,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(self.read()?.transaction(owner_id, id))
    }

    fn categories(&self, owner_id: OwnerId) -> Result<Vec<Category>, StoreError> {
        Ok(self.read()?.categories_for(owner_id))
    }

    fn run_atomic(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| StoreError::Unavailable(format!("Failed to acquire write lock: {}", e)))?;

        let mut staged = state.clone();
        for op in &ops {
            staged.apply(op)?;
        }

        // Persist before publishing, so a reopened store always agrees with
        // what callers were told.
        write_json_atomic(&self.path, &staged)?;
        *state = staged;
        Ok(())
    }
}
