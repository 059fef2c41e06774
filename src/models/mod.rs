//! Core data models
//!
//! All entity types stored in the ledger, their typed ids, and the exact
//! `Money` arithmetic they share.

pub mod account;
pub mod category;
pub mod ids;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountValidationError};
pub use category::{
    resolve_category_name, system_category, system_defaults, Category, CategoryOwner,
    CategoryValidationError, UNKNOWN_CATEGORY,
};
pub use ids::{AccountId, CategoryId, OwnerId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use transaction::{Transaction, TransactionKind, TransactionValidationError};
