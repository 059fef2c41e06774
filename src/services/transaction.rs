//! Transaction service
//!
//! The only write path for transactions. Every create, update, and delete
//! commits the transaction record together with the implied account-balance
//! adjustments as one atomic batch, with the balance writes conditioned on
//! the account version read at the start of the attempt. A concurrent
//! writer invalidates the condition; the losing attempt re-reads and
//! retries, and surfaces a conflict once the retry budget runs out.

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AccountId, CategoryId, Money, OwnerId, Transaction, TransactionId, TransactionKind,
};
use crate::reconcile::{delta, BalanceAdjustment};
use crate::store::{LedgerStore, StoreError, WriteOp};

use super::MAX_BALANCE_ATTEMPTS;

/// Service for transaction management
pub struct TransactionService<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
}

/// Input for creating a new transaction
///
/// Callers may supply their own `id`; retrying a create with the same id
/// after a timeout returns the already-committed transaction instead of
/// double-applying it.
#[derive(Debug, Clone)]
pub struct CreateTransaction {
    pub id: Option<TransactionId>,
    pub owner_id: OwnerId,
    pub account_id: AccountId,
    pub kind: TransactionKind,
    pub amount: Money,
    pub category_id: CategoryId,
    pub date: NaiveDate,
    pub note: String,
}

/// Field edits for an existing transaction; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateTransaction {
    pub account_id: Option<AccountId>,
    pub kind: Option<TransactionKind>,
    pub amount: Option<Money>,
    pub category_id: Option<CategoryId>,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
}

impl<'a, S: LedgerStore + ?Sized> TransactionService<'a, S> {
    /// Create a new transaction service
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Record a new transaction and apply its balance effect atomically
    pub fn create(&self, input: CreateTransaction) -> LedgerResult<Transaction> {
        if input.kind == TransactionKind::Transfer {
            return Err(LedgerError::Validation(
                "Transfer transactions are not supported yet; record the two legs as \
                 separate income and expense transactions"
                    .into(),
            ));
        }
        if !input.amount.is_positive() {
            return Err(LedgerError::Validation(format!(
                "Transaction amount must be positive, got {}",
                input.amount
            )));
        }

        // Idempotent retry: a repeated create with the same id is a no-op
        if let Some(id) = input.id {
            if let Some(existing) = self.store.transaction(input.owner_id, id)? {
                return Ok(existing);
            }
        }

        self.verify_account(input.owner_id, input.account_id)?;
        self.verify_category(input.owner_id, input.category_id)?;

        let mut txn = Transaction::new(
            input.owner_id,
            input.account_id,
            input.kind,
            input.amount,
            input.category_id,
            input.date,
        )
        .with_note(input.note);
        if let Some(id) = input.id {
            txn.id = id;
        }
        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let mut contended = txn.account_id;
        for attempt in 1..=MAX_BALANCE_ATTEMPTS {
            let mut ops =
                self.adjustment_ops(txn.owner_id, &delta(None, Some(&txn)))?;
            ops.push(WriteOp::PutTransaction(txn.clone()));

            match self.store.run_atomic(ops) {
                Ok(()) => return Ok(txn),
                Err(StoreError::VersionMismatch { account, .. }) => {
                    log::debug!(
                        "balance write conflict on {} (attempt {}/{})",
                        account,
                        attempt,
                        MAX_BALANCE_ATTEMPTS
                    );
                    contended = account;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(LedgerError::Conflict {
            account: contended.to_string(),
            attempts: MAX_BALANCE_ATTEMPTS,
        })
    }

    /// Edit a transaction, atomically reversing its old balance effect and
    /// applying the new one
    pub fn update(
        &self,
        owner_id: OwnerId,
        id: TransactionId,
        patch: UpdateTransaction,
    ) -> LedgerResult<Transaction> {
        if patch.kind == Some(TransactionKind::Transfer) {
            return Err(LedgerError::Validation(
                "Transfer transactions are not supported yet".into(),
            ));
        }

        let mut contended: Option<AccountId> = None;
        for attempt in 1..=MAX_BALANCE_ATTEMPTS {
            // Re-read both the transaction and the accounts every attempt so
            // the delta is always computed against committed state.
            let old = self
                .store
                .transaction(owner_id, id)?
                .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;

            let mut new = old.clone();
            if let Some(account_id) = patch.account_id {
                new.account_id = account_id;
            }
            if let Some(kind) = patch.kind {
                new.kind = kind;
            }
            if let Some(amount) = patch.amount {
                new.amount = amount;
            }
            if let Some(category_id) = patch.category_id {
                new.category_id = category_id;
            }
            if let Some(date) = patch.date {
                new.date = date;
            }
            if let Some(ref note) = patch.note {
                new.note = note.clone();
            }
            new.touch();

            new.validate()
                .map_err(|e| LedgerError::Validation(e.to_string()))?;
            if new.account_id != old.account_id {
                self.verify_account(owner_id, new.account_id)?;
            }
            if new.category_id != old.category_id {
                self.verify_category(owner_id, new.category_id)?;
            }

            let mut ops =
                self.adjustment_ops(owner_id, &delta(Some(&old), Some(&new)))?;
            ops.push(WriteOp::PutTransaction(new.clone()));

            match self.store.run_atomic(ops) {
                Ok(()) => return Ok(new),
                Err(StoreError::VersionMismatch { account, .. }) => {
                    log::debug!(
                        "balance write conflict on {} (attempt {}/{})",
                        account,
                        attempt,
                        MAX_BALANCE_ATTEMPTS
                    );
                    contended = Some(account);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(LedgerError::Conflict {
            account: contended.map(|a| a.to_string()).unwrap_or_default(),
            attempts: MAX_BALANCE_ATTEMPTS,
        })
    }

    /// Remove a transaction and atomically reverse its balance effect
    pub fn delete(&self, owner_id: OwnerId, id: TransactionId) -> LedgerResult<Transaction> {
        let mut contended: Option<AccountId> = None;
        for attempt in 1..=MAX_BALANCE_ATTEMPTS {
            let old = self
                .store
                .transaction(owner_id, id)?
                .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;

            let mut ops = self.adjustment_ops(owner_id, &delta(Some(&old), None))?;
            ops.push(WriteOp::DeleteTransaction { owner_id, id });

            match self.store.run_atomic(ops) {
                Ok(()) => return Ok(old),
                Err(StoreError::VersionMismatch { account, .. }) => {
                    log::debug!(
                        "balance write conflict on {} (attempt {}/{})",
                        account,
                        attempt,
                        MAX_BALANCE_ATTEMPTS
                    );
                    contended = Some(account);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(LedgerError::Conflict {
            account: contended.map(|a| a.to_string()).unwrap_or_default(),
            attempts: MAX_BALANCE_ATTEMPTS,
        })
    }

    /// Get a transaction by ID
    pub fn get(&self, owner_id: OwnerId, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        Ok(self.store.transaction(owner_id, id)?)
    }

    /// List all transactions for an owner, most recent first
    pub fn list(&self, owner_id: OwnerId) -> LedgerResult<Vec<Transaction>> {
        Ok(self.store.transactions(owner_id)?)
    }

    /// Build version-conditioned account writes for a set of adjustments
    ///
    /// Each affected account is read fresh; the write carries the version we
    /// read, so any concurrent balance change fails the batch and triggers a
    /// retry instead of a lost update. Adjustments against accounts that no
    /// longer exist are dropped: deleted accounts keep their transaction
    /// history, and there is no balance cache left to maintain for them.
    fn adjustment_ops(
        &self,
        owner_id: OwnerId,
        adjustments: &[BalanceAdjustment],
    ) -> LedgerResult<Vec<WriteOp>> {
        let mut ops = Vec::with_capacity(adjustments.len() + 1);
        for adjustment in adjustments {
            let Some(account) = self.store.account(owner_id, adjustment.account_id)? else {
                log::debug!(
                    "account {} no longer exists; skipping balance adjustment",
                    adjustment.account_id
                );
                continue;
            };
            let expected_version = account.version;
            let mut updated = account;
            updated.apply_adjustment(adjustment.amount);
            ops.push(WriteOp::PutAccount {
                account: updated,
                expected_version: Some(expected_version),
            });
        }
        Ok(ops)
    }

    fn verify_account(&self, owner_id: OwnerId, id: AccountId) -> LedgerResult<()> {
        self.store
            .account(owner_id, id)?
            .ok_or_else(|| LedgerError::account_not_found(id.to_string()))?;
        Ok(())
    }

    fn verify_category(&self, owner_id: OwnerId, id: CategoryId) -> LedgerResult<()> {
        let categories = self.store.categories(owner_id)?;
        if categories.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(LedgerError::category_not_found(id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{system_category, Account};
    use crate::reconcile::compute_balance;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn setup() -> (MemoryStore, OwnerId, AccountId, CategoryId) {
        let store = MemoryStore::new();
        let owner = OwnerId::new();
        let account = Account::new(owner, "Checking", "TWD", "#0ea5e9");
        let account_id = account.id;
        store.upsert_account(account).unwrap();
        let category_id = system_category("Food").unwrap().id;
        (store, owner, account_id, category_id)
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn create_input(
        owner_id: OwnerId,
        account_id: AccountId,
        kind: TransactionKind,
        cents: i64,
        category_id: CategoryId,
    ) -> CreateTransaction {
        CreateTransaction {
            id: None,
            owner_id,
            account_id,
            kind,
            amount: Money::from_cents(cents),
            category_id,
            date: date(10),
            note: String::new(),
        }
    }

    fn assert_balances_consistent(store: &impl LedgerStore, owner: OwnerId) {
        let transactions = store.transactions(owner).unwrap();
        for account in store.accounts(owner).unwrap() {
            assert_eq!(
                account.balance,
                compute_balance(&transactions, account.id),
                "balance drift on account {}",
                account.name
            );
        }
    }

    #[test]
    fn test_create_applies_balance() {
        let (store, owner, account_id, category_id) = setup();
        let service = TransactionService::new(&store);

        service
            .create(create_input(
                owner,
                account_id,
                TransactionKind::Income,
                100_000,
                system_category("Salary").unwrap().id,
            ))
            .unwrap();
        service
            .create(create_input(
                owner,
                account_id,
                TransactionKind::Expense,
                25_000,
                category_id,
            ))
            .unwrap();

        let account = store.account(owner, account_id).unwrap().unwrap();
        assert_eq!(account.balance.cents(), 75_000);
        assert_balances_consistent(&store, owner);
    }

    #[test]
    fn test_create_rejects_bad_input() {
        let (store, owner, account_id, category_id) = setup();
        let service = TransactionService::new(&store);

        let zero = service.create(create_input(
            owner,
            account_id,
            TransactionKind::Expense,
            0,
            category_id,
        ));
        assert!(matches!(zero, Err(LedgerError::Validation(_))));

        let transfer = service.create(create_input(
            owner,
            account_id,
            TransactionKind::Transfer,
            1_000,
            category_id,
        ));
        assert!(matches!(transfer, Err(LedgerError::Validation(_))));

        let missing_account = service.create(create_input(
            owner,
            AccountId::new(),
            TransactionKind::Expense,
            1_000,
            category_id,
        ));
        assert!(missing_account.unwrap_err().is_not_found());

        let missing_category = service.create(create_input(
            owner,
            account_id,
            TransactionKind::Expense,
            1_000,
            CategoryId::new(),
        ));
        assert!(missing_category.unwrap_err().is_not_found());

        // Nothing was written
        assert!(store.transactions(owner).unwrap().is_empty());
        assert_balances_consistent(&store, owner);
    }

    #[test]
    fn test_create_is_idempotent_with_caller_id() {
        let (store, owner, account_id, category_id) = setup();
        let service = TransactionService::new(&store);

        let mut input = create_input(
            owner,
            account_id,
            TransactionKind::Expense,
            5_000,
            category_id,
        );
        input.id = Some(TransactionId::new());

        let first = service.create(input.clone()).unwrap();
        let second = service.create(input).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.transactions(owner).unwrap().len(), 1);

        // The balance effect applied exactly once
        let account = store.account(owner, account_id).unwrap().unwrap();
        assert_eq!(account.balance.cents(), -5_000);
    }

    #[test]
    fn test_update_reverses_old_amount() {
        let (store, owner, account_id, category_id) = setup();
        let service = TransactionService::new(&store);

        // Balance 1000.00 from income, then a 100.00 expense
        service
            .create(create_input(
                owner,
                account_id,
                TransactionKind::Income,
                100_000,
                system_category("Salary").unwrap().id,
            ))
            .unwrap();
        let expense = service
            .create(create_input(
                owner,
                account_id,
                TransactionKind::Expense,
                10_000,
                category_id,
            ))
            .unwrap();

        // Raising the expense to 150.00 must land on 850.00, not 950.00
        service
            .update(
                owner,
                expense.id,
                UpdateTransaction {
                    amount: Some(Money::from_cents(15_000)),
                    ..Default::default()
                },
            )
            .unwrap();

        let account = store.account(owner, account_id).unwrap().unwrap();
        assert_eq!(account.balance.cents(), 85_000);
        assert_balances_consistent(&store, owner);
    }

    #[test]
    fn test_update_moves_between_accounts() {
        let (store, owner, account_a, category_id) = setup();
        let other = Account::new(owner, "Savings", "TWD", "#22c55e");
        let account_b = other.id;
        store.upsert_account(other).unwrap();

        let service = TransactionService::new(&store);
        let txn = service
            .create(create_input(
                owner,
                account_a,
                TransactionKind::Expense,
                2_000,
                category_id,
            ))
            .unwrap();

        service
            .update(
                owner,
                txn.id,
                UpdateTransaction {
                    account_id: Some(account_b),
                    ..Default::default()
                },
            )
            .unwrap();

        let a = store.account(owner, account_a).unwrap().unwrap();
        let b = store.account(owner, account_b).unwrap().unwrap();
        assert!(a.balance.is_zero());
        assert_eq!(b.balance.cents(), -2_000);
        assert_balances_consistent(&store, owner);
    }

    #[test]
    fn test_create_then_delete_is_balance_neutral() {
        let (store, owner, account_id, category_id) = setup();
        let service = TransactionService::new(&store);

        let txn = service
            .create(create_input(
                owner,
                account_id,
                TransactionKind::Expense,
                7_500,
                category_id,
            ))
            .unwrap();
        service.delete(owner, txn.id).unwrap();

        let account = store.account(owner, account_id).unwrap().unwrap();
        assert!(account.balance.is_zero());
        assert!(store.transactions(owner).unwrap().is_empty());
        assert_balances_consistent(&store, owner);
    }

    #[test]
    fn test_orphaned_history_stays_editable_after_account_deletion() {
        let (store, owner, account_id, category_id) = setup();
        let service = TransactionService::new(&store);
        let txn = service
            .create(create_input(
                owner,
                account_id,
                TransactionKind::Expense,
                3_000,
                category_id,
            ))
            .unwrap();

        // Deleting the account retains its history
        store.delete_account(owner, account_id).unwrap();

        let updated = service
            .update(
                owner,
                txn.id,
                UpdateTransaction {
                    amount: Some(Money::from_cents(9_000)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount.cents(), 9_000);

        service.delete(owner, txn.id).unwrap();
        assert!(store.transactions(owner).unwrap().is_empty());
    }

    #[test]
    fn test_update_and_delete_missing_transaction() {
        let (store, owner, _, _) = setup();
        let service = TransactionService::new(&store);

        let update = service.update(owner, TransactionId::new(), UpdateTransaction::default());
        assert!(update.unwrap_err().is_not_found());

        let delete = service.delete(owner, TransactionId::new());
        assert!(delete.unwrap_err().is_not_found());
    }

    #[test]
    fn test_operations_are_scoped_to_owner() {
        let (store, owner, account_id, category_id) = setup();
        let service = TransactionService::new(&store);
        let txn = service
            .create(create_input(
                owner,
                account_id,
                TransactionKind::Expense,
                1_000,
                category_id,
            ))
            .unwrap();

        let stranger = OwnerId::new();
        assert!(service.delete(stranger, txn.id).unwrap_err().is_not_found());
        assert!(service
            .update(stranger, txn.id, UpdateTransaction::default())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_invariant_holds_across_mixed_operations() {
        let (store, owner, account_id, category_id) = setup();
        let service = TransactionService::new(&store);
        let salary = system_category("Salary").unwrap().id;

        let t1 = service
            .create(create_input(owner, account_id, TransactionKind::Income, 80_000, salary))
            .unwrap();
        assert_balances_consistent(&store, owner);

        let t2 = service
            .create(create_input(owner, account_id, TransactionKind::Expense, 12_000, category_id))
            .unwrap();
        assert_balances_consistent(&store, owner);

        service
            .update(
                owner,
                t2.id,
                UpdateTransaction {
                    kind: Some(TransactionKind::Income),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_balances_consistent(&store, owner);

        service.delete(owner, t1.id).unwrap();
        assert_balances_consistent(&store, owner);

        let account = store.account(owner, account_id).unwrap().unwrap();
        assert_eq!(account.balance.cents(), 12_000);
    }

    #[test]
    fn test_concurrent_writers_never_lose_updates() {
        let store = Arc::new(MemoryStore::new());
        let owner = OwnerId::new();
        let account = Account::new(owner, "Shared", "TWD", "#0ea5e9");
        let account_id = account.id;
        store.upsert_account(account).unwrap();
        let category_id = system_category("Food").unwrap().id;

        let threads: i64 = 8;
        let per_thread: i64 = 5;
        let mut handles = Vec::new();
        for _ in 0..threads {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                let service = TransactionService::new(&*store);
                for _ in 0..per_thread {
                    // The caller retries the whole operation on Conflict
                    loop {
                        let result = service.create(CreateTransaction {
                            id: None,
                            owner_id: owner,
                            account_id,
                            kind: TransactionKind::Expense,
                            amount: Money::from_cents(1_000),
                            category_id,
                            date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
                            note: String::new(),
                        });
                        match result {
                            Ok(_) => break,
                            Err(e) if e.is_conflict() => continue,
                            Err(e) => panic!("unexpected error: {}", e),
                        }
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let account = store.account(owner, account_id).unwrap().unwrap();
        assert_eq!(account.balance.cents(), -(threads * per_thread * 1_000));
        assert_balances_consistent(&*store, owner);
    }

    /// Store wrapper whose conditioned writes always fail, to exercise the
    /// retry budget
    struct ContendedStore {
        inner: MemoryStore,
    }

    impl LedgerStore for ContendedStore {
        fn accounts(&self, owner_id: OwnerId) -> Result<Vec<Account>, StoreError> {
            self.inner.accounts(owner_id)
        }
        fn account(
            &self,
            owner_id: OwnerId,
            id: AccountId,
        ) -> Result<Option<Account>, StoreError> {
            self.inner.account(owner_id, id)
        }
        fn transactions(&self, owner_id: OwnerId) -> Result<Vec<Transaction>, StoreError> {
            self.inner.transactions(owner_id)
        }
        fn transaction(
            &self,
            owner_id: OwnerId,
            id: TransactionId,
        ) -> Result<Option<Transaction>, StoreError> {
            self.inner.transaction(owner_id, id)
        }
        fn categories(
            &self,
            owner_id: OwnerId,
        ) -> Result<Vec<crate::models::Category>, StoreError> {
            self.inner.categories(owner_id)
        }
        fn run_atomic(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
            for op in &ops {
                if let WriteOp::PutAccount {
                    account,
                    expected_version: Some(expected),
                } = op
                {
                    return Err(StoreError::VersionMismatch {
                        account: account.id,
                        expected: *expected,
                        found: expected + 1,
                    });
                }
            }
            self.inner.run_atomic(ops)
        }
    }

    #[test]
    fn test_exhausted_retries_surface_conflict() {
        let inner = MemoryStore::new();
        let owner = OwnerId::new();
        let account = Account::new(owner, "Busy", "TWD", "#0ea5e9");
        let account_id = account.id;
        inner.upsert_account(account).unwrap();
        let store = ContendedStore { inner };

        let service = TransactionService::new(&store);
        let result = service.create(CreateTransaction {
            id: None,
            owner_id: owner,
            account_id,
            kind: TransactionKind::Expense,
            amount: Money::from_cents(1_000),
            category_id: system_category("Food").unwrap().id,
            date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            note: String::new(),
        });

        match result {
            Err(LedgerError::Conflict { attempts, .. }) => {
                assert_eq!(attempts, MAX_BALANCE_ATTEMPTS)
            }
            other => panic!("expected conflict, got {:?}", other.map(|t| t.id)),
        }

        // The losing caller left no partial state behind
        assert!(store.transactions(owner).unwrap().is_empty());
    }
}
