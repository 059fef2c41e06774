//! Demo ledger seeding
//!
//! Populates an empty owner with a small, realistic month of data so the
//! reports and advice surfaces have something to show on first run. The
//! seeded balances are derived from the seeded transactions, so the ledger
//! is born consistent.

use chrono::{Datelike, NaiveDate};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    system_category, Account, CategoryId, Money, OwnerId, Transaction, TransactionKind,
};
use crate::reconcile::compute_balance;
use crate::store::{LedgerStore, WriteOp};

fn default_category(name: &str) -> LedgerResult<CategoryId> {
    system_category(name)
        .map(|c| c.id)
        .ok_or_else(|| LedgerError::Validation(format!("Missing default category: {}", name)))
}

fn day_of(today: NaiveDate, day: u32) -> LedgerResult<NaiveDate> {
    today
        .with_day(day)
        .ok_or_else(|| LedgerError::Validation(format!("Invalid day of month: {}", day)))
}

/// Seed a demo ledger for an owner with no accounts yet
///
/// Returns the owner's accounts: the freshly seeded ones, or the existing
/// ones untouched if the owner already has data. The whole seed commits as
/// one atomic batch.
pub fn seed_demo_ledger<S: LedgerStore + ?Sized>(
    store: &S,
    owner_id: OwnerId,
    today: NaiveDate,
    currency: &str,
) -> LedgerResult<Vec<Account>> {
    let existing = store.accounts(owner_id)?;
    if !existing.is_empty() {
        return Ok(existing);
    }

    let mut salary_account = Account::new(owner_id, "Salary Account", currency, "#0ea5e9");
    let mut cash_wallet = Account::new(owner_id, "Cash Wallet", currency, "#22c55e");
    let mut credit_card = Account::new(owner_id, "Credit Card", currency, "#ef4444");

    use TransactionKind::{Expense, Income};
    let entries: [(TransactionKind, i64, &str, u32, &str, AccountRef); 7] = [
        (Income, 65_000, "Salary", 5, "Monthly salary", AccountRef::Salary),
        (Expense, 18_000, "Housing", 5, "Rent transfer", AccountRef::Salary),
        (Expense, 120, "Food", 1, "Convenience store breakfast", AccountRef::Cash),
        (Expense, 250, "Food", 2, "Lunch box", AccountRef::Cash),
        (Expense, 1_200, "Food", 4, "Family dinner", AccountRef::Credit),
        (Expense, 100, "Transport", 3, "Transit card top-up", AccountRef::Cash),
        (Income, 3_500, "Investment", 15, "ETF dividend", AccountRef::Salary),
    ];

    let mut transactions = Vec::with_capacity(entries.len());
    for (kind, amount, category, day, note, target) in entries {
        let account_id = match target {
            AccountRef::Salary => salary_account.id,
            AccountRef::Cash => cash_wallet.id,
            AccountRef::Credit => credit_card.id,
        };
        transactions.push(
            Transaction::new(
                owner_id,
                account_id,
                kind,
                Money::from_major(amount),
                default_category(category)?,
                day_of(today, day)?,
            )
            .with_note(note),
        );
    }

    salary_account.balance = compute_balance(&transactions, salary_account.id);
    cash_wallet.balance = compute_balance(&transactions, cash_wallet.id);
    credit_card.balance = compute_balance(&transactions, credit_card.id);

    let accounts = vec![salary_account, cash_wallet, credit_card];
    let mut ops: Vec<WriteOp> = accounts
        .iter()
        .map(|account| WriteOp::PutAccount {
            account: account.clone(),
            expected_version: None,
        })
        .collect();
    ops.extend(transactions.into_iter().map(WriteOp::PutTransaction));

    store.run_atomic(ops)?;
    Ok(accounts)
}

enum AccountRef {
    Salary,
    Cash,
    Credit,
}
