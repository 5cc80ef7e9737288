//! In-memory ledger store.
//!
//! Accounts live in a concurrent map, committed rows in an append-only
//! log. Exclusive per-account locks are `tokio` mutexes acquired in the
//! caller's (globally ordered) sequence, each under the configured wait
//! budget. A commit unit appends all of its staged rows under a single
//! log write guard, so a reader can never observe one transfer leg
//! without the other.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;

use passbook_core::ledger::{Account, LedgerError, LedgerStore, StoreUnit, Transaction};
use passbook_shared::config::LockingConfig;
use passbook_shared::types::AccountId;

/// Errors from the account-administration boundary.
///
/// These sit outside the engine's intent protocol: account provisioning
/// belongs to the excluded user-management layer, but the store still has
/// to enforce ownership exclusivity and referential integrity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountAdminError {
    /// An account with this id already exists.
    #[error("Account already exists: {0}")]
    DuplicateAccount(AccountId),

    /// The owner already has an account; ownership is exclusive.
    #[error("Owner already has an account")]
    OwnerAlreadyHasAccount,

    /// No account with this id.
    #[error("Unknown account: {0}")]
    UnknownAccount(AccountId),

    /// The account is referenced by transaction rows and must not be
    /// deleted. Referential integrity blocks, never cascades.
    #[error("Account {0} is referenced by transactions and cannot be deleted")]
    AccountInUse(AccountId),
}

/// In-memory ledger store.
pub struct MemoryStore {
    accounts: Arc<DashMap<AccountId, Account>>,
    locks: DashMap<AccountId, Arc<Mutex<()>>>,
    log: Arc<RwLock<Vec<Transaction>>>,
    // Serializes account registration/removal so the owner-exclusivity
    // scan and the insert are one step.
    admin: std::sync::Mutex<()>,
    lock_budget: Duration,
}

impl MemoryStore {
    /// Creates an empty store with the given locking configuration.
    #[must_use]
    pub fn new(locking: &LockingConfig) -> Self {
        Self {
            accounts: Arc::new(DashMap::new()),
            locks: DashMap::new(),
            log: Arc::new(RwLock::new(Vec::new())),
            admin: std::sync::Mutex::new(()),
            lock_budget: locking.wait_budget(),
        }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// `DuplicateAccount` if the id is taken, `OwnerAlreadyHasAccount` if
    /// the owner already holds an account (ownership is exclusive).
    pub fn insert_account(&self, account: Account) -> Result<(), AccountAdminError> {
        let _admin = self
            .admin
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if self.accounts.contains_key(&account.id) {
            return Err(AccountAdminError::DuplicateAccount(account.id));
        }
        if self
            .accounts
            .iter()
            .any(|entry| entry.value().owner == account.owner)
        {
            return Err(AccountAdminError::OwnerAlreadyHasAccount);
        }
        debug!(account = %account.id, owner = %account.owner, "account registered");
        self.accounts.insert(account.id, account);
        Ok(())
    }

    /// Deletes an account, refusing while any transaction row references
    /// it in any role.
    ///
    /// # Errors
    ///
    /// `UnknownAccount` or `AccountInUse`.
    pub async fn remove_account(&self, id: AccountId) -> Result<(), AccountAdminError> {
        let log = self.log.read().await;
        let _admin = self
            .admin
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if !self.accounts.contains_key(&id) {
            return Err(AccountAdminError::UnknownAccount(id));
        }
        if log.iter().any(|row| row.references(id)) {
            return Err(AccountAdminError::AccountInUse(id));
        }
        drop(log);
        self.accounts.remove(&id);
        self.locks.remove(&id);
        Ok(())
    }

    /// Number of committed rows, across all accounts.
    pub async fn row_count(&self) -> usize {
        self.log.read().await.len()
    }

    fn lock_handle(&self, id: AccountId) -> Arc<Mutex<()>> {
        self.locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    type Unit = MemoryUnit;

    async fn find_account(&self, id: AccountId) -> Result<Option<Account>, LedgerError> {
        Ok(self.accounts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn transactions_for(&self, id: AccountId) -> Result<Vec<Transaction>, LedgerError> {
        let log = self.log.read().await;
        Ok(log
            .iter()
            .filter(|row| row.account_id == id)
            .cloned()
            .collect())
    }

    async fn begin(&self, lock_order: &[AccountId]) -> Result<MemoryUnit, LedgerError> {
        let mut guards = Vec::with_capacity(lock_order.len());
        let mut previous = None;
        for &id in lock_order {
            // lock_order is sorted; skipping duplicates keeps a repeated
            // id from self-deadlocking.
            if previous == Some(id) {
                continue;
            }
            previous = Some(id);

            // Unknown ids never have rows to serialize; refusing before
            // lock_handle keeps ghost entries out of the lock table.
            if !self.accounts.contains_key(&id) {
                return Err(LedgerError::AccountNotFound(id));
            }
            let handle = self.lock_handle(id);
            let guard = tokio::time::timeout(self.lock_budget, handle.lock_owned())
                .await
                .map_err(|_| LedgerError::LockConflict)?;
            guards.push(guard);
        }
        debug!(locks = guards.len(), "commit unit opened");

        Ok(MemoryUnit {
            accounts: Arc::clone(&self.accounts),
            log: Arc::clone(&self.log),
            staged: Vec::new(),
            _guards: guards,
        })
    }
}

/// An open commit unit: account locks held, rows staged but invisible.
pub struct MemoryUnit {
    accounts: Arc<DashMap<AccountId, Account>>,
    log: Arc<RwLock<Vec<Transaction>>>,
    staged: Vec<Transaction>,
    _guards: Vec<OwnedMutexGuard<()>>,
}

#[async_trait]
impl StoreUnit for MemoryUnit {
    async fn account(&self, id: AccountId) -> Result<Option<Account>, LedgerError> {
        Ok(self.accounts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn transactions(&self, id: AccountId) -> Result<Vec<Transaction>, LedgerError> {
        let log = self.log.read().await;
        Ok(log
            .iter()
            .filter(|row| row.account_id == id)
            .cloned()
            .collect())
    }

    fn stage(&mut self, row: Transaction) {
        self.staged.push(row);
    }

    async fn commit(self) -> Result<Vec<Transaction>, LedgerError> {
        {
            // One write guard for all staged rows: legs become visible
            // together or not at all.
            let mut log = self.log.write().await;
            log.extend(self.staged.iter().cloned());
        }
        debug!(rows = self.staged.len(), "unit committed");
        Ok(self.staged)
    }

    async fn rollback(self) -> Result<(), LedgerError> {
        debug!(discarded = self.staged.len(), "unit rolled back");
        Ok(())
    }
}
