//! Prompt construction for the advice backend

use crate::models::{resolve_category_name, Account, Category, Money, Transaction};

use super::RECENT_TRANSACTION_LIMIT;

/// Build the analysis prompt from a ledger snapshot
///
/// Includes the combined balance of all accounts and the most recent
/// transactions (capped to keep the context small).
pub fn build_prompt(
    transactions: &[Transaction],
    categories: &[Category],
    accounts: &[Account],
) -> String {
    let total_balance: Money = accounts.iter().map(|a| a.balance).sum();

    let mut recent: Vec<&Transaction> = transactions.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
    recent.truncate(RECENT_TRANSACTION_LIMIT);

    let lines: Vec<String> = recent
        .iter()
        .map(|t| {
            format!(
                "- {}: {} {} ({}) - {}",
                t.date.format("%Y-%m-%d"),
                t.kind,
                t.amount,
                resolve_category_name(categories, t.category_id),
                t.note
            )
        })
        .collect();

    format!(
        "You are a professional personal finance adviser. Based on the user's \
         financial data below, provide brief, insightful analysis and suggestions.\n\
         \n\
         Total balance: {total_balance}\n\
         \n\
         Most recent transactions (up to {limit}):\n\
         {transactions}\n\
         \n\
         Please cover:\n\
         1. Spending habit analysis.\n\
         2. Potential saving opportunities.\n\
         3. An overall financial health score from 1 to 10.\n\
         \n\
         Respond in Markdown with a friendly, professional tone.",
        total_balance = total_balance,
        limit = RECENT_TRANSACTION_LIMIT,
        transactions = lines.join("\n"),
    )
}
