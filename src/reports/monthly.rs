//! Monthly income/expense summaries
//!
//! Month boundaries follow the local civil calendar carried by the
//! transaction dates themselves; nothing is shifted through UTC.

use chrono::Datelike;

use crate::models::{Money, Transaction, TransactionKind};

/// Income, expense, and net for one calendar month
///
/// `income` and `expense` are both non-negative magnitudes;
/// `net = income - expense`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlySummary {
    pub income: Money,
    pub expense: Money,
    pub net: Money,
}

/// Summarize the transactions falling in the given calendar month
pub fn monthly_summary(transactions: &[Transaction], year: i32, month: u32) -> MonthlySummary {
    let mut income = Money::zero();
    let mut expense = Money::zero();

    for txn in transactions
        .iter()
        .filter(|t| t.date.year() == year && t.date.month() == month)
    {
        match txn.kind {
            TransactionKind::Income => income += txn.amount,
            TransactionKind::Expense => expense += txn.amount,
            TransactionKind::Transfer => {}
        }
    }

    MonthlySummary {
        income,
        expense,
        net: income - expense,
    }
}

/// One month in a trend series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthPoint {
    pub year: i32,
    pub month: u32,
    pub income: Money,
    pub expense: Money,
}

/// The last `months` calendar months ending at the given month, oldest first
pub fn monthly_trend(
    transactions: &[Transaction],
    end_year: i32,
    end_month: u32,
    months: u32,
) -> Vec<MonthPoint> {
    let mut points = Vec::with_capacity(months as usize);
    let (mut year, mut month) = (end_year, end_month);

    for _ in 0..months {
        let summary = monthly_summary(transactions, year, month);
        points.push(MonthPoint {
            year,
            month,
            income: summary.income,
            expense: summary.expense,
        });
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }

    points.reverse();
    points
}
