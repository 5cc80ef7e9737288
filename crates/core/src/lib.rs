//! Core ledger engine for Passbook.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. Accounts hold no stored balance; every balance is derived
//! from the append-only transaction ledger.
//!
//! # Modules
//!
//! - `ledger` - Balance projection, intent validation, atomic commit
//!   orchestration and the engine facade

pub mod ledger;
