//! Account aggregate.

use chrono::{DateTime, Utc};
use passbook_shared::types::{AccountId, UserId};
use serde::{Deserialize, Serialize};

/// A customer account.
///
/// Deliberately carries no balance field: balance is always derived from
/// the account's transaction rows. Accounts are created once at opening
/// and never mutated afterwards except through owned transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// The owning user. Ownership is exclusive: no two accounts share an
    /// owner.
    pub owner: UserId,
    /// Display name of the bank.
    pub bank_name: String,
    /// Display name of the branch.
    pub branch: String,
    /// When the account was opened.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Opens a new account for `owner`.
    #[must_use]
    pub fn open(owner: UserId, bank_name: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            id: AccountId::new(),
            owner,
            bank_name: bank_name.into(),
            branch: branch.into(),
            created_at: Utc::now(),
        }
    }
}
