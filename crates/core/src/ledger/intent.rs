//! Intent types: the raw boundary shape and its validated form.

use passbook_shared::types::{AccountId, Money};
use serde::{Deserialize, Serialize};

use super::transaction::TransactionKind;

/// A proposed transaction as the caller hands it in.
///
/// This is the flat, deserializable boundary shape: every field the API
/// layer could supply is optional so the validator can report precisely
/// what is missing or malformed. [`crate::ledger::validate`] turns it into
/// a [`ValidatedIntent`] whose variants make illegal states
/// unrepresentable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionIntent {
    /// What the caller wants to do.
    pub kind: TransactionKind,
    /// Target account (deposit/withdrawal).
    #[serde(default)]
    pub account: Option<AccountId>,
    /// Source account (transfer).
    #[serde(default)]
    pub source: Option<AccountId>,
    /// Destination account (transfer).
    #[serde(default)]
    pub destination: Option<AccountId>,
    /// Amount to move.
    #[serde(default)]
    pub amount: Option<Money>,
    /// Free-form note.
    #[serde(default)]
    pub note: Option<String>,
}

impl TransactionIntent {
    /// Builds a deposit intent.
    #[must_use]
    pub fn deposit(account: AccountId, amount: Money, note: Option<String>) -> Self {
        Self {
            kind: TransactionKind::Deposit,
            account: Some(account),
            source: None,
            destination: None,
            amount: Some(amount),
            note,
        }
    }

    /// Builds a withdrawal intent.
    #[must_use]
    pub fn withdrawal(account: AccountId, amount: Money, note: Option<String>) -> Self {
        Self {
            kind: TransactionKind::Withdrawal,
            account: Some(account),
            source: None,
            destination: None,
            amount: Some(amount),
            note,
        }
    }

    /// Builds a transfer intent.
    #[must_use]
    pub fn transfer(
        source: AccountId,
        destination: AccountId,
        amount: Money,
        note: Option<String>,
    ) -> Self {
        Self {
            kind: TransactionKind::Transfer,
            account: None,
            source: Some(source),
            destination: Some(destination),
            amount: Some(amount),
            note,
        }
    }
}

/// A structurally legal intent, produced only by the validator.
///
/// Financial legality (sufficiency) is deliberately NOT encoded here: it
/// depends on state and is checked by the orchestrator under lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedIntent {
    /// Credit `account` with `amount`.
    Deposit {
        /// Target account.
        account: AccountId,
        /// Strictly positive amount.
        amount: Money,
        /// Free-form note.
        note: Option<String>,
    },
    /// Debit `account` by `amount`.
    Withdrawal {
        /// Source account.
        account: AccountId,
        /// Strictly positive amount.
        amount: Money,
        /// Free-form note.
        note: Option<String>,
    },
    /// Move `amount` from `source` to `destination` as two legs.
    Transfer {
        /// Debited account.
        source: AccountId,
        /// Credited account; always distinct from `source`.
        destination: AccountId,
        /// Strictly positive amount.
        amount: Money,
        /// Free-form note.
        note: Option<String>,
    },
}

impl ValidatedIntent {
    /// The accounts this intent touches, in global lock order
    /// (ascending account id).
    #[must_use]
    pub fn lock_order(&self) -> Vec<AccountId> {
        match self {
            Self::Deposit { account, .. } | Self::Withdrawal { account, .. } => vec![*account],
            Self::Transfer {
                source,
                destination,
                ..
            } => {
                let mut ids = vec![*source, *destination];
                ids.sort_unstable();
                ids
            }
        }
    }

    /// The amount being moved.
    #[must_use]
    pub const fn amount(&self) -> Money {
        match self {
            Self::Deposit { amount, .. }
            | Self::Withdrawal { amount, .. }
            | Self::Transfer { amount, .. } => *amount,
        }
    }
}
