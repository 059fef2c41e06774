//! Account model
//!
//! Represents a bank account, wallet, or card. The `balance` field is a
//! derived cache of the signed sum of the account's transactions; it is
//! mutated only through the transaction service and the repair path, never
//! set directly by callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, OwnerId};
use super::money::Money;

/// A financial account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// The owner this account belongs to
    pub owner_id: OwnerId,

    /// Account name (e.g. "Salary Account")
    pub name: String,

    /// Cached sum of signed transaction amounts against this account
    pub balance: Money,

    /// ISO currency code (display only; no conversion is performed)
    pub currency: String,

    /// Display color (hex)
    pub color: String,

    /// Optimistic-concurrency stamp, bumped by the store on every
    /// conditioned write
    #[serde(default)]
    pub version: u64,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a zero balance
    ///
    /// Opening money is recorded as an ordinary income transaction so the
    /// balance stays derivable from the transaction log from day one.
    pub fn new(
        owner_id: OwnerId,
        name: impl Into<String>,
        currency: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            owner_id,
            name: name.into(),
            balance: Money::zero(),
            currency: currency.into(),
            color: color.into(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a signed balance adjustment
    pub fn apply_adjustment(&mut self, amount: Money) {
        self.balance += amount;
        self.updated_at = Utc::now();
    }

    /// Overwrite the cached balance with a recomputed ground-truth value
    pub fn set_repaired_balance(&mut self, balance: Money) {
        self.balance = balance;
        self.updated_at = Utc::now();
    }

    /// Rename the account
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Change the display color
    pub fn recolor(&mut self, color: impl Into<String>) {
        self.color = color.into();
        self.updated_at = Utc::now();
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }
        if self.name.len() > 100 {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }
        if self.currency.trim().is_empty() {
            return Err(AccountValidationError::EmptyCurrency);
        }
        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.currency, self.balance)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
    EmptyCurrency,
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 100)", len)
            }
            Self::EmptyCurrency => write!(f, "Account currency cannot be empty"),
        }
    }
}

impl std::error::Error for AccountValidationError {}
