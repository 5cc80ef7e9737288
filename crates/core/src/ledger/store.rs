//! The ledger store boundary.
//!
//! The engine assumes a durable, transactional store for account and
//! transaction rows. This module specifies that boundary: unlocked reads
//! for queries, and an atomic unit that holds exclusive locks on a fixed
//! set of accounts from `begin` until `commit` or `rollback`.

use async_trait::async_trait;
use passbook_shared::types::AccountId;

use super::account::Account;
use super::error::LedgerError;
use super::transaction::Transaction;

/// Durable storage for accounts and transaction rows.
///
/// Implementations must provide row-level exclusive locking (or a
/// serializable-isolation equivalent) through [`LedgerStore::begin`]; the
/// orchestrator relies on it to close the read-then-write race on
/// sufficiency checks.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// The atomic unit type produced by [`LedgerStore::begin`].
    type Unit: StoreUnit;

    /// Reads an account without locking. Suitable for queries only.
    async fn find_account(&self, id: AccountId) -> Result<Option<Account>, LedgerError>;

    /// Reads all rows owned by an account's history without locking.
    /// Suitable for queries only; sufficiency checks must read through a
    /// unit instead.
    async fn transactions_for(&self, id: AccountId) -> Result<Vec<Transaction>, LedgerError>;

    /// Opens an atomic unit holding exclusive locks on `lock_order`.
    ///
    /// `lock_order` is already globally ordered (ascending account id);
    /// implementations must acquire strictly in the order given and bound
    /// each acquisition, surfacing `LockConflict` on budget exhaustion.
    /// An id with no account may be refused outright with
    /// `AccountNotFound` instead of locking it.
    async fn begin(&self, lock_order: &[AccountId]) -> Result<Self::Unit, LedgerError>;
}

/// One atomic commit unit with account locks held.
///
/// Dropping a unit without committing must release its locks and discard
/// staged rows (rollback semantics).
#[async_trait]
pub trait StoreUnit: Send {
    /// Reads an account under the unit's locks.
    async fn account(&self, id: AccountId) -> Result<Option<Account>, LedgerError>;

    /// Reads all rows owned by an account's history under the unit's
    /// locks. Never stale relative to committed conflicting writes.
    async fn transactions(&self, id: AccountId) -> Result<Vec<Transaction>, LedgerError>;

    /// Stages a row for commit. Nothing becomes visible until
    /// [`StoreUnit::commit`].
    fn stage(&mut self, row: Transaction);

    /// Commits every staged row as one unit: all rows become visible
    /// atomically, then locks release. Returns the committed rows in
    /// staging order.
    async fn commit(self) -> Result<Vec<Transaction>, LedgerError>;

    /// Discards staged rows and releases locks.
    async fn rollback(self) -> Result<(), LedgerError>;
}
