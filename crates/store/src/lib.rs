//! In-memory implementation of the Passbook ledger store boundary.
//!
//! This crate provides:
//! - `MemoryStore`: per-account exclusive locks, an append-only row log
//!   with atomic commit units, and account administration with
//!   referential-integrity protection
//!
//! It is the reference implementation of the locking and atomicity
//! contract the engine depends on, and the substrate for the engine's
//! integration and concurrency tests.

pub mod memory;

pub use memory::{AccountAdminError, MemoryStore};
