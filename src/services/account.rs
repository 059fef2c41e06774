//! Account service
//!
//! Account lifecycle plus the out-of-band consistency path: `audit` compares
//! every cached balance against the ground truth derived from the
//! transaction log, and `repair` rewrites a drifted balance under the same
//! version-conditioned write discipline the hot path uses. Balances are
//! never settable through the update API.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId, Money, OwnerId};
use crate::reconcile::compute_balance;
use crate::store::{LedgerStore, StoreError, WriteOp};

use super::MAX_BALANCE_ATTEMPTS;

/// Service for account management and balance auditing
pub struct AccountService<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
}

/// Input for creating a new account
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub owner_id: OwnerId,
    pub name: String,
    pub currency: String,
    pub color: String,
}

/// Metadata edits for an account; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub name: Option<String>,
    pub currency: Option<String>,
    pub color: Option<String>,
}

/// A cached balance that disagrees with the transaction log
#[derive(Debug, Clone)]
pub struct BalanceDrift {
    pub account_id: AccountId,
    pub name: String,
    pub recorded: Money,
    pub derived: Money,
}

impl BalanceDrift {
    /// How far the cache is from ground truth
    pub fn drift(&self) -> Money {
        self.recorded - self.derived
    }
}

impl<'a, S: LedgerStore + ?Sized> AccountService<'a, S> {
    /// Create a new account service
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create an account with a zero starting balance
    pub fn create(&self, input: CreateAccount) -> LedgerResult<Account> {
        let account = Account::new(input.owner_id, input.name, input.currency, input.color);
        account
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        self.store.upsert_account(account.clone())?;
        Ok(account)
    }

    /// Get an account by ID
    pub fn get(&self, owner_id: OwnerId, id: AccountId) -> LedgerResult<Option<Account>> {
        Ok(self.store.account(owner_id, id)?)
    }

    /// List all accounts for an owner
    pub fn list(&self, owner_id: OwnerId) -> LedgerResult<Vec<Account>> {
        Ok(self.store.accounts(owner_id)?)
    }

    /// Edit account metadata (never the balance)
    pub fn update(
        &self,
        owner_id: OwnerId,
        id: AccountId,
        patch: UpdateAccount,
    ) -> LedgerResult<Account> {
        for _ in 0..MAX_BALANCE_ATTEMPTS {
            let account = self
                .store
                .account(owner_id, id)?
                .ok_or_else(|| LedgerError::account_not_found(id.to_string()))?;

            let expected_version = account.version;
            let mut updated = account;
            if let Some(ref name) = patch.name {
                updated.rename(name.clone());
            }
            if let Some(ref currency) = patch.currency {
                updated.currency = currency.clone();
            }
            if let Some(ref color) = patch.color {
                updated.recolor(color.clone());
            }
            updated
                .validate()
                .map_err(|e| LedgerError::Validation(e.to_string()))?;

            match self.store.run_atomic(vec![WriteOp::PutAccount {
                account: updated.clone(),
                expected_version: Some(expected_version),
            }]) {
                Ok(()) => return Ok(updated),
                Err(StoreError::VersionMismatch { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(LedgerError::Conflict {
            account: id.to_string(),
            attempts: MAX_BALANCE_ATTEMPTS,
        })
    }

    /// Delete an account; its transaction history is retained
    pub fn delete(&self, owner_id: OwnerId, id: AccountId) -> LedgerResult<()> {
        self.store
            .account(owner_id, id)?
            .ok_or_else(|| LedgerError::account_not_found(id.to_string()))?;
        self.store.delete_account(owner_id, id)?;
        Ok(())
    }

    /// Compare every cached balance against the transaction log
    ///
    /// Returns only the accounts whose cache has drifted. Diagnostic path:
    /// a healthy system returns an empty list here no matter how it is
    /// raced.
    pub fn audit(&self, owner_id: OwnerId) -> LedgerResult<Vec<BalanceDrift>> {
        let transactions = self.store.transactions(owner_id)?;
        let mut drifted = Vec::new();
        for account in self.store.accounts(owner_id)? {
            let derived = compute_balance(&transactions, account.id);
            if account.balance != derived {
                log::warn!(
                    "balance drift on account {}: recorded {}, derived {}",
                    account.id,
                    account.balance,
                    derived
                );
                drifted.push(BalanceDrift {
                    account_id: account.id,
                    name: account.name,
                    recorded: account.balance,
                    derived,
                });
            }
        }
        Ok(drifted)
    }

    /// Rewrite one account's balance from ground truth
    pub fn repair(&self, owner_id: OwnerId, id: AccountId) -> LedgerResult<Account> {
        for _ in 0..MAX_BALANCE_ATTEMPTS {
            let account = self
                .store
                .account(owner_id, id)?
                .ok_or_else(|| LedgerError::account_not_found(id.to_string()))?;
            let transactions = self.store.transactions(owner_id)?;
            let derived = compute_balance(&transactions, id);

            if account.balance == derived {
                return Ok(account);
            }

            let expected_version = account.version;
            let mut repaired = account;
            repaired.set_repaired_balance(derived);

            match self.store.run_atomic(vec![WriteOp::PutAccount {
                account: repaired.clone(),
                expected_version: Some(expected_version),
            }]) {
                Ok(()) => {
                    log::info!("repaired balance of account {} to {}", id, derived);
                    return Ok(repaired);
                }
                Err(StoreError::VersionMismatch { .. }) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(LedgerError::Conflict {
            account: id.to_string(),
            attempts: MAX_BALANCE_ATTEMPTS,
        })
    }

    /// Repair every drifted account for an owner
    pub fn repair_all(&self, owner_id: OwnerId) -> LedgerResult<Vec<Account>> {
        let mut repaired = Vec::new();
        for drift in self.audit(owner_id)? {
            repaired.push(self.repair(owner_id, drift.account_id)?);
        }
        Ok(repaired)
    }
}
