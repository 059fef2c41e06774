//! Transaction model
//!
//! A transaction records a single income or expense against one account.
//! The sign of its effect on the account balance is implied by the kind;
//! the stored amount itself is always non-negative.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId, OwnerId, TransactionId};
use super::money::Money;

/// Kind of transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Money flowing into the account
    Income,
    /// Money flowing out of the account
    Expense,
    /// Declared for data-model compatibility; carries no single-account
    /// effect until a linked two-leg model exists, and the transaction
    /// service rejects it
    Transfer,
}

impl TransactionKind {
    /// Parse a kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
            Self::Transfer => write!(f, "Transfer"),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// The owner whose ledger this transaction belongs to
    pub owner_id: OwnerId,

    /// The account this transaction is recorded against
    pub account_id: AccountId,

    /// Income, expense, or (unsupported) transfer
    pub kind: TransactionKind,

    /// Non-negative amount; the sign of the balance effect comes from `kind`
    pub amount: Money,

    /// The category this transaction is filed under
    pub category_id: CategoryId,

    /// Transaction date (local civil calendar)
    pub date: NaiveDate,

    /// Free-form note
    #[serde(default)]
    pub note: String,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last modified
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        owner_id: OwnerId,
        account_id: AccountId,
        kind: TransactionKind,
        amount: Money,
        category_id: CategoryId,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            owner_id,
            account_id,
            kind,
            amount,
            category_id,
            date,
            note: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a note, builder style
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// The signed effect of this transaction on its account's balance
    ///
    /// Positive for income, negative for expense, zero for transfers.
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
            TransactionKind::Transfer => Money::zero(),
        }
    }

    /// Refresh the modification stamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Transaction amount must be positive, got {}", amount)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: TransactionKind, cents: i64) -> Transaction {
        Transaction::new(
            OwnerId::new(),
            AccountId::new(),
            kind,
            Money::from_cents(cents),
            CategoryId::new(),
            NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
        )
    }

    #[test]
    fn test_signed_amount() {
        assert_eq!(
            sample(TransactionKind::Income, 5000).signed_amount().cents(),
            5000
        );
        assert_eq!(
            sample(TransactionKind::Expense, 5000).signed_amount().cents(),
            -5000
        );
        assert_eq!(
            sample(TransactionKind::Transfer, 5000).signed_amount().cents(),
            0
        );
    }

    #[test]
    fn test_validate_rejects_non_positive_amounts() {
        assert!(sample(TransactionKind::Income, 1).validate().is_ok());
        assert!(matches!(
            sample(TransactionKind::Income, 0).validate(),
            Err(TransactionValidationError::NonPositiveAmount(_))
        ));
        assert!(sample(TransactionKind::Expense, -100).validate().is_err());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(TransactionKind::parse("income"), Some(TransactionKind::Income));
        assert_eq!(TransactionKind::parse("EXPENSE"), Some(TransactionKind::Expense));
        assert_eq!(TransactionKind::parse("Transfer"), Some(TransactionKind::Transfer));
        assert_eq!(TransactionKind::parse("loan"), None);
    }

    #[test]
    fn test_kind_serialization_matches_wire_format() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Income).unwrap(),
            "\"INCOME\""
        );
        assert_eq!(
            serde_json::to_string(&TransactionKind::Expense).unwrap(),
            "\"EXPENSE\""
        );
    }

    #[test]
    fn test_serialization_round_trip() {
        let txn = sample(TransactionKind::Expense, 2500).with_note("lunch");
        let json = serde_json::to_string(&txn).unwrap();
        let deserialized: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(txn.id, deserialized.id);
        assert_eq!(txn.amount, deserialized.amount);
        assert_eq!(txn.note, deserialized.note);
    }

    #[test]
    fn test_display() {
        let txn = sample(TransactionKind::Expense, 5000);
        assert_eq!(format!("{}", txn), "2026-03-15 Expense 50.00");
    }
}
