//! In-memory ledger store
//!
//! Backs tests and embedders that bring their own persistence. A single
//! RwLock over the whole state makes `run_atomic` genuinely atomic: the
//! batch is applied to a copy under the write lock and swapped in only if
//! every op validates.

use std::sync::RwLock;

use super::{LedgerState, LedgerStore, StoreError, WriteOp};
use crate::models::{Account, AccountId, Category, OwnerId, Transaction, TransactionId};

/// In-memory implementation of [`LedgerStore`]
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<LedgerState>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, LedgerState>, StoreError> {
        self.state
            .read()
            .map_err(|e| StoreError::Unavailable(format!("Failed to acquire read lock: {}", e)))
    }
}

impl LedgerStore for MemoryStore {
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
        *state = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, Money, TransactionKind};
    use chrono::NaiveDate;

    fn account(owner_id: OwnerId, name: &str) -> Account {
        Account::new(owner_id, name, "TWD", "#0ea5e9")
    }

    fn txn(owner_id: OwnerId, account_id: AccountId, cents: i64) -> Transaction {
        Transaction::new(
            owner_id,
            account_id,
            TransactionKind::Expense,
            Money::from_cents(cents),
            CategoryId::new(),
            NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
        )
    }

    #[test]
    fn test_upsert_and_read_back() {
        let store = MemoryStore::new();
        let owner = OwnerId::new();
        let acc = account(owner, "Checking");

        store.upsert_account(acc.clone()).unwrap();

        let listed = store.accounts(owner).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "Checking");
        assert!(store.account(owner, acc.id).unwrap().is_some());
    }

    #[test]
    fn test_reads_are_scoped_to_owner() {
        let store = MemoryStore::new();
        let alice = OwnerId::new();
        let bob = OwnerId::new();
        let acc = account(alice, "Alice's");

        store.upsert_account(acc.clone()).unwrap();

        assert!(store.accounts(bob).unwrap().is_empty());
        assert!(store.account(bob, acc.id).unwrap().is_none());
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let store = MemoryStore::new();
        let owner = OwnerId::new();
        let acc = account(owner, "Checking");
        let good = txn(owner, acc.id, 1000);

        // Second op deletes a transaction that doesn't exist, so the put of
        // the first must not survive either.
        let result = store.run_atomic(vec![
            WriteOp::PutTransaction(good.clone()),
            WriteOp::DeleteTransaction {
                owner_id: owner,
                id: TransactionId::new(),
            },
        ]);

        assert!(matches!(result, Err(StoreError::Rejected(_))));
        assert!(store.transaction(owner, good.id).unwrap().is_none());
    }

    #[test]
    fn test_conditioned_write_detects_stale_version() {
        let store = MemoryStore::new();
        let owner = OwnerId::new();
        let acc = account(owner, "Checking");
        store.upsert_account(acc.clone()).unwrap();

        let fresh = store.account(owner, acc.id).unwrap().unwrap();

        // First conditioned write succeeds and bumps the version
        let mut updated = fresh.clone();
        updated.apply_adjustment(Money::from_cents(-500));
        store
            .run_atomic(vec![WriteOp::PutAccount {
                account: updated,
                expected_version: Some(fresh.version),
            }])
            .unwrap();

        // A second write conditioned on the same version must fail
        let mut stale = fresh.clone();
        stale.apply_adjustment(Money::from_cents(-900));
        let result = store.run_atomic(vec![WriteOp::PutAccount {
            account: stale,
            expected_version: Some(fresh.version),
        }]);

        assert!(matches!(result, Err(StoreError::VersionMismatch { .. })));

        // Only the first delta landed
        let current = store.account(owner, acc.id).unwrap().unwrap();
        assert_eq!(current.balance.cents(), -500);
    }

    #[test]
    fn test_unconditional_put_still_moves_version_forward() {
        let store = MemoryStore::new();
        let owner = OwnerId::new();
        let acc = account(owner, "Checking");
        store.upsert_account(acc.clone()).unwrap();

        let v0 = store.account(owner, acc.id).unwrap().unwrap().version;
        store.upsert_account(acc.clone()).unwrap();
        let v1 = store.account(owner, acc.id).unwrap().unwrap().version;
        assert!(v1 > v0);
    }

    #[test]
    fn test_categories_merge_system_defaults_first() {
        let store = MemoryStore::new();
        let owner = OwnerId::new();
        let custom = Category::new_user(owner, "Pets", TransactionKind::Expense, "🐕", "#10b981");
        store.upsert_category(custom.clone()).unwrap();

        let listed = store.categories(owner).unwrap();
        assert_eq!(listed.len(), 9);
        assert!(listed[..8].iter().all(|c| c.is_system()));
        assert_eq!(listed[8].name, "Pets");

        // Another owner doesn't see the custom category
        assert_eq!(store.categories(OwnerId::new()).unwrap().len(), 8);
    }

    #[test]
    fn test_system_categories_cannot_be_written() {
        let store = MemoryStore::new();
        let defaults = crate::models::system_defaults();

        let result = store.upsert_category(defaults[0].clone());
        assert!(matches!(result, Err(StoreError::Rejected(_))));

        let result = store.delete_category(OwnerId::new(), defaults[0].id);
        assert!(matches!(result, Err(StoreError::Rejected(_))));
    }

    #[test]
    fn test_delete_account_retains_history() {
        let store = MemoryStore::new();
        let owner = OwnerId::new();
        let acc = account(owner, "Checking");
        let t = txn(owner, acc.id, 1000);

        store.upsert_account(acc.clone()).unwrap();
        store.upsert_transaction(t.clone()).unwrap();
        store.delete_account(owner, acc.id).unwrap();

        assert!(store.account(owner, acc.id).unwrap().is_none());
        assert!(store.transaction(owner, t.id).unwrap().is_some());
    }

    #[test]
    fn test_transactions_sorted_most_recent_first() {
        let store = MemoryStore::new();
        let owner = OwnerId::new();
        let acc = account(owner, "Checking");

        let mut early = txn(owner, acc.id, 100);
        early.date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let mut late = txn(owner, acc.id, 200);
        late.date = NaiveDate::from_ymd_opt(2026, 6, 5).unwrap();

        store.upsert_transaction(early).unwrap();
        store.upsert_transaction(late).unwrap();

        let listed = store.transactions(owner).unwrap();
        assert_eq!(listed[0].amount.cents(), 200);
        assert_eq!(listed[1].amount.cents(), 100);
    }
}
