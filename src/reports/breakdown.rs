//! Spending breakdown by category
//!
//! Groups expense transactions by resolved category name. Dangling category
//! references collapse into one placeholder slice rather than disappearing,
//! so deleted categories never make spending vanish from the report.

use std::collections::HashMap;

use crate::models::{Category, Money, Transaction, TransactionKind, UNKNOWN_CATEGORY};

const FALLBACK_COLOR: &str = "#9ca3af";

/// One category's share of spending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySlice {
    pub name: String,
    pub amount: Money,
    pub color: String,
}

/// Sum expense transactions per resolved category name
///
/// Ordered by descending amount for presentation stability, ties broken by
/// name ascending.
pub fn category_breakdown(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategorySlice> {
    let mut totals: HashMap<String, (Money, String)> = HashMap::new();

    for txn in transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
    {
        let (name, color) = match categories.iter().find(|c| c.id == txn.category_id) {
            Some(category) => (category.name.clone(), category.color.clone()),
            None => (UNKNOWN_CATEGORY.to_string(), FALLBACK_COLOR.to_string()),
        };
        let entry = totals.entry(name).or_insert((Money::zero(), color));
        entry.0 += txn.amount;
    }

    let mut slices: Vec<CategorySlice> = totals
        .into_iter()
        .map(|(name, (amount, color))| CategorySlice {
            name,
            amount,
            color,
        })
        .collect();
    slices.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.name.cmp(&b.name)));
    slices
}
