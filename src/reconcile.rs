//! Balance reconciliation
//!
//! Pure computations that keep an account's cached balance consistent with
//! its transaction history: deriving the ground-truth balance from the log,
//! and computing the per-account adjustments implied by creating, editing,
//! or deleting a transaction. No side effects; the transaction service and
//! the repair path are the only callers that turn these values into writes.

use crate::models::{AccountId, Money, Transaction};

/// A signed balance adjustment to apply to one account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceAdjustment {
    pub account_id: AccountId,
    pub amount: Money,
}

/// Derive an account's ground-truth balance from the transaction log
pub fn compute_balance(transactions: &[Transaction], account_id: AccountId) -> Money {
    transactions
        .iter()
        .filter(|t| t.account_id == account_id)
        .map(|t| t.signed_amount())
        .sum()
}

/// Compute the per-account adjustments implied by a transaction change
///
/// `old` and `new` are the previous and next states of one transaction;
/// `None` on either side models a create or a delete. An edit that keeps the
/// account nets to a single adjusted delta (omitted entirely when it nets to
/// zero); an edit that moves the transaction yields a reversal on the old
/// account and an application on the new one.
pub fn delta(old: Option<&Transaction>, new: Option<&Transaction>) -> Vec<BalanceAdjustment> {
    match (old, new) {
        (None, None) => Vec::new(),
        (None, Some(created)) => vec![BalanceAdjustment {
            account_id: created.account_id,
            amount: created.signed_amount(),
        }],
        (Some(deleted), None) => vec![BalanceAdjustment {
            account_id: deleted.account_id,
            amount: -deleted.signed_amount(),
        }],
        (Some(before), Some(after)) if before.account_id == after.account_id => {
            let net = after.signed_amount() - before.signed_amount();
            if net.is_zero() {
                Vec::new()
            } else {
                vec![BalanceAdjustment {
                    account_id: after.account_id,
                    amount: net,
                }]
            }
        }
        (Some(before), Some(after)) => vec![
            BalanceAdjustment {
                account_id: before.account_id,
                amount: -before.signed_amount(),
            },
            BalanceAdjustment {
                account_id: after.account_id,
                amount: after.signed_amount(),
            },
        ],
    }
}
