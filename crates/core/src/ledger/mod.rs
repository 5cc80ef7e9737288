//! Derived-balance ledger logic.
//!
//! This module implements the core ledger functionality:
//! - Account and transaction-row domain types
//! - Balance projection from transaction history
//! - Intent validation (structural and financial legality)
//! - The ledger store boundary (locking, atomic units)
//! - The commit orchestrator for single- and dual-leg writes
//! - The engine facade (deposit, withdraw, transfer, balance, history)
//! - Error types for ledger operations

pub mod account;
pub mod balance;
pub mod engine;
pub mod error;
pub mod intent;
pub mod orchestrator;
pub mod store;
pub mod transaction;
pub mod validation;

#[cfg(test)]
mod balance_props;
#[cfg(test)]
mod validation_props;

pub use account::Account;
pub use balance::{AccountBalance, balance_for};
pub use engine::{
    DepositOutcome, HistoryFilter, LedgerEngine, TransferOutcome, WithdrawalOutcome,
};
pub use error::LedgerError;
pub use intent::{TransactionIntent, ValidatedIntent};
pub use orchestrator::{CommitReceipt, Orchestrator};
pub use store::{LedgerStore, StoreUnit};
pub use transaction::{EntryDirection, Transaction, TransactionKind, TransactionStatus};
pub use validation::{check_funds, validate};
