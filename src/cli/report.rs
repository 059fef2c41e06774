//! Reporting commands

use anyhow::{anyhow, bail, Result};
use chrono::Datelike;
use clap::Subcommand;

use crate::config::Settings;
use crate::reports::{category_breakdown, monthly_summary, monthly_trend};
use crate::services::CategoryService;
use crate::store::LedgerStore;

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Income, expense, and net for one calendar month
    Month {
        /// Month as YYYY-MM, defaults to the current month
        month: Option<String>,
    },

    /// Spending by category, largest first
    Categories,

    /// Monthly income/expense trend
    Trend {
        /// How many months to include
        #[arg(long, default_value_t = 6)]
        months: u32,
    },
}

pub fn handle_report_command<S: LedgerStore + ?Sized>(
    store: &S,
    settings: &Settings,
    command: ReportCommands,
) -> Result<()> {
    let owner_id = settings.owner_id;
    let transactions = store.transactions(owner_id)?;

    match command {
        ReportCommands::Month { month } => {
            let (year, month) = match month {
                Some(s) => parse_month(&s)?,
                None => {
                    let today = chrono::Local::now().date_naive();
                    (today.year(), today.month())
                }
            };
            let summary = monthly_summary(&transactions, year, month);
            println!("Report for {}-{:02}", year, month);
            println!("  Income:  {:>14}", summary.income.to_string());
            println!("  Expense: {:>14}", summary.expense.to_string());
            println!("  Net:     {:>14}", summary.net.to_string());
        }
        ReportCommands::Categories => {
            let categories = CategoryService::new(store).list(owner_id)?;
            let slices = category_breakdown(&transactions, &categories);
            if slices.is_empty() {
                println!("No expense transactions yet.");
                return Ok(());
            }
            for slice in slices {
                println!("{:<20} {:>14}", slice.name, slice.amount.to_string());
            }
        }
        ReportCommands::Trend { months } => {
            let today = chrono::Local::now().date_naive();
            let trend = monthly_trend(&transactions, today.year(), today.month(), months);
            println!("{:<8} {:>14} {:>14}", "Month", "Income", "Expense");
            for point in trend {
                println!(
                    "{}-{:02}  {:>14} {:>14}",
                    point.year, point.month, point.income.to_string(), point.expense.to_string()
                );
            }
        }
    }

    Ok(())
}

fn parse_month(s: &str) -> Result<(i32, u32)> {
    let (year, month) = s
        .split_once('-')
        .ok_or_else(|| anyhow!("Expected YYYY-MM, got '{}'", s))?;
    let year: i32 = year.parse().map_err(|_| anyhow!("Invalid year '{}'", year))?;
    let month: u32 = month
        .parse()
        .map_err(|_| anyhow!("Invalid month '{}'", month))?;
    if !(1..=12).contains(&month) {
        bail!("Month out of range: {}", month);
    }
    Ok((year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2026-03").unwrap(), (2026, 3));
        assert_eq!(parse_month("2025-12").unwrap(), (2025, 12));
        assert!(parse_month("2026").is_err());
        assert!(parse_month("2026-13").is_err());
        assert!(parse_month("march").is_err());
    }
}
