//! Passbook teller
//!
//! Runs a short demonstration session against the in-memory ledger:
//! opens two accounts, then deposits, withdraws and transfers between
//! them, logging each outcome. Useful for eyeballing the engine's
//! behavior without wiring up a service around it.

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use passbook_core::ledger::{Account, HistoryFilter, LedgerEngine};
use passbook_shared::LedgerConfig;
use passbook_shared::types::{Money, UserId};
use passbook_store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "passbook=debug,teller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = LedgerConfig::load().context("failed to load configuration")?;
    let store = MemoryStore::new(&config.locking);
    let engine = LedgerEngine::new(store, config);

    let teller = UserId::new();
    let alice = Account::open(UserId::new(), "Passbook Savings", "Central");
    let bob = Account::open(UserId::new(), "Passbook Savings", "Harbor");
    engine
        .store()
        .insert_account(alice.clone())
        .context("failed to open first account")?;
    engine
        .store()
        .insert_account(bob.clone())
        .context("failed to open second account")?;
    info!(account = %alice.id, branch = %alice.branch, "opened account");
    info!(account = %bob.id, branch = %bob.branch, "opened account");

    let deposit = engine
        .deposit(
            teller,
            alice.id,
            Money::parse("1000.00")?,
            Some("opening deposit".to_string()),
        )
        .await?;
    info!(
        account = %alice.id,
        transaction = %deposit.transaction.id,
        balance = %deposit.new_balance,
        "deposit committed"
    );

    // An overdraft attempt, expected to bounce.
    match engine
        .withdraw(teller, alice.id, Money::parse("1500.00")?, None)
        .await
    {
        Ok(outcome) => info!(balance = %outcome.new_balance, "withdrawal committed"),
        Err(err) => warn!(code = err.error_code(), "withdrawal rejected: {err}"),
    }

    let transfer = engine
        .transfer(
            teller,
            alice.id,
            bob.id,
            Money::parse("250.00")?,
            Some("rent share".to_string()),
        )
        .await?;
    info!(
        transfer = %transfer.debit_transaction.transfer_id.map_or_else(String::new, |id| id.to_string()),
        source_balance = %transfer.source_balance,
        destination_balance = %transfer.destination_balance,
        "transfer committed"
    );

    let withdrawal = engine
        .withdraw(teller, bob.id, Money::parse("50.00")?, None)
        .await?;
    info!(
        account = %bob.id,
        balance = %withdrawal.new_balance,
        "withdrawal committed"
    );

    for account in [&alice, &bob] {
        let balance = engine.balance(account.id, None).await?;
        let history = engine.history(account.id, HistoryFilter::default()).await?;
        info!(
            account = %account.id,
            balance = %balance,
            transactions = history.meta.total,
            "final statement"
        );
        for row in &history.data {
            info!(
                transaction = %row.id,
                kind = ?row.kind,
                direction = ?row.direction,
                amount = %row.amount,
                note = row.note.as_deref().unwrap_or("-"),
                "  statement line"
            );
        }
    }

    Ok(())
}
