//! Business logic layer
//!
//! Services orchestrate validated reads and atomic writes against a
//! [`LedgerStore`](crate::store::LedgerStore). All balance mutation flows
//! through here; nothing else in the crate writes to accounts.

pub mod account;
pub mod category;
pub mod seed;
pub mod transaction;

pub use account::{AccountService, BalanceDrift, CreateAccount, UpdateAccount};
pub use category::{CategoryService, CreateCategory};
pub use seed::seed_demo_ledger;
pub use transaction::{CreateTransaction, TransactionService, UpdateTransaction};

/// Attempts before a contended balance write gives up with `Conflict`
pub(crate) const MAX_BALANCE_ATTEMPTS: u32 = 5;
