//! Operator commands: balance audit/repair, advice, demo seeding

use anyhow::{anyhow, Result};

use crate::advice::{gemini::API_KEY_ENV, AdviceService, GeminiBackend};
use crate::config::Settings;
use crate::services::{seed_demo_ledger, AccountService};
use crate::store::LedgerStore;

/// Check every cached balance against the transaction log, optionally
/// rewriting the ones that drifted
pub fn handle_audit<S: LedgerStore + ?Sized>(
    store: &S,
    settings: &Settings,
    repair: bool,
) -> Result<()> {
    let service = AccountService::new(store);
    let drifted = service.audit(settings.owner_id)?;

    if drifted.is_empty() {
        println!("All account balances agree with the transaction log.");
        return Ok(());
    }

    for drift in &drifted {
        println!(
            "{}  {:<24} recorded {:>14}  derived {:>14}  drift {:>14}",
            drift.account_id,
            drift.name,
            drift.recorded.to_string(),
            drift.derived.to_string(),
            drift.drift().to_string()
        );
    }

    if repair {
        let repaired = service.repair_all(settings.owner_id)?;
        println!("Repaired {} account(s) from the transaction log.", repaired.len());
    } else {
        println!("Run with --repair to rewrite drifted balances from the log.");
    }

    Ok(())
}

/// Generate AI commentary over the current ledger
pub fn handle_advise<S: LedgerStore + ?Sized>(store: &S, settings: &Settings) -> Result<()> {
    let owner_id = settings.owner_id;
    let transactions = store.transactions(owner_id)?;
    let categories = store.categories(owner_id)?;
    let accounts = store.accounts(owner_id)?;

    let api_key = std::env::var(API_KEY_ENV)
        .map_err(|_| anyhow!("Set {} to use the advise command", API_KEY_ENV))?;
    let backend = GeminiBackend::with_model(api_key, settings.advice_model.clone());
    let service = AdviceService::new(backend);

    println!("{}", service.generate(&transactions, &categories, &accounts));
    Ok(())
}

/// Seed a small demo ledger for an empty owner
pub fn handle_seed_demo<S: LedgerStore + ?Sized>(store: &S, settings: &Settings) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let accounts = seed_demo_ledger(store, settings.owner_id, today, &settings.currency)?;

    println!("Ledger now has {} account(s):", accounts.len());
    for account in accounts {
        println!("  {:<24} {} {:>14}", account.name, account.currency, account.balance.to_string());
    }
    Ok(())
}
