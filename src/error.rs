//! Custom error types for ledgerkeep
//!
//! This module defines the error hierarchy for ledger operations using
//! thiserror for ergonomic error definitions.

use thiserror::Error;

use crate::store::StoreError;

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Bad input, rejected before any write is attempted
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found for the calling owner
    #[error("{entity} not found: {id}")]
    NotFound {
        entity: &'static str,
        id: String,
    },

    /// Optimistic-concurrency retry budget exhausted on a balance update
    #[error("Conflict updating account {account} after {attempts} attempts")]
    Conflict { account: String, attempts: u32 },

    /// Backing store unreachable or an atomic batch was rejected
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors (paths, settings)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Account",
            id: id.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Transaction",
            id: id.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Category",
            id: id.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an optimistic-concurrency conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
