//! Transaction rows: the append-only ledger records.

use chrono::{DateTime, Utc};
use passbook_shared::types::{AccountId, Money, TransactionId, TransferId, UserId};
use serde::{Deserialize, Serialize};

/// Transaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money entering an account from outside the ledger.
    Deposit,
    /// Money leaving an account to outside the ledger.
    Withdrawal,
    /// One leg of a two-row transfer between accounts.
    Transfer,
}

/// Transaction status.
///
/// A committed, queryable row is always `Success`. `Pending` and `Failed`
/// are transient/rejected states and never aggregate into balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// In flight, not yet committed.
    Pending,
    /// Committed and visible.
    Success,
    /// Rejected; kept only as a terminal marker, never queried back.
    Failed,
}

/// The effect of a row on the account that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    /// Increases the owning account's balance.
    Credit,
    /// Decreases the owning account's balance.
    Debit,
}

/// A single immutable ledger row.
///
/// Deposits and withdrawals are one row. A transfer is exactly two rows
/// sharing an amount and a [`TransferId`]: a debit leg owned by the source
/// account and a credit leg owned by the destination account. Both legs
/// reference both accounts for auditability, but each leg belongs to one
/// account's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, immutable once committed.
    pub id: TransactionId,
    /// The account whose history owns this row.
    pub account_id: AccountId,
    /// Transaction kind.
    pub kind: TransactionKind,
    /// Effect of this row on `account_id`.
    pub direction: EntryDirection,
    /// Amount moved; always strictly positive.
    pub amount: Money,
    /// Source account (transfer legs only).
    pub source_account: Option<AccountId>,
    /// Destination account (transfer legs only).
    pub destination_account: Option<AccountId>,
    /// Correlation id shared by the two legs of a transfer.
    pub transfer_id: Option<TransferId>,
    /// Free-form note.
    pub note: Option<String>,
    /// Row status.
    pub status: TransactionStatus,
    /// The authorized caller that initiated the operation.
    pub initiated_by: UserId,
    /// Commit timestamp; balance-as-of queries cut on this.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds a committed deposit row.
    #[must_use]
    pub fn deposit(
        account: AccountId,
        amount: Money,
        note: Option<String>,
        initiated_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            account_id: account,
            kind: TransactionKind::Deposit,
            direction: EntryDirection::Credit,
            amount,
            source_account: None,
            destination_account: None,
            transfer_id: None,
            note,
            status: TransactionStatus::Success,
            initiated_by,
            created_at,
        }
    }

    /// Builds a committed withdrawal row.
    #[must_use]
    pub fn withdrawal(
        account: AccountId,
        amount: Money,
        note: Option<String>,
        initiated_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            account_id: account,
            kind: TransactionKind::Withdrawal,
            direction: EntryDirection::Debit,
            amount,
            source_account: None,
            destination_account: None,
            transfer_id: None,
            note,
            status: TransactionStatus::Success,
            initiated_by,
            created_at,
        }
    }

    /// Builds the correlated (debit, credit) leg pair of a transfer.
    ///
    /// Both legs share the amount, timestamp and transfer id, and both
    /// reference both accounts. Leg notes get the "Transfer to/from" prefix
    /// the account statements show.
    #[must_use]
    pub fn transfer_pair(
        source: AccountId,
        destination: AccountId,
        amount: Money,
        note: Option<String>,
        initiated_by: UserId,
        created_at: DateTime<Utc>,
    ) -> (Self, Self) {
        let transfer_id = TransferId::new();

        let debit_note = match &note {
            Some(n) => format!("Transfer to {destination}: {n}"),
            None => format!("Transfer to {destination}"),
        };
        let credit_note = match &note {
            Some(n) => format!("Transfer from {source}: {n}"),
            None => format!("Transfer from {source}"),
        };

        let debit = Self {
            id: TransactionId::new(),
            account_id: source,
            kind: TransactionKind::Transfer,
            direction: EntryDirection::Debit,
            amount,
            source_account: Some(source),
            destination_account: Some(destination),
            transfer_id: Some(transfer_id),
            note: Some(debit_note),
            status: TransactionStatus::Success,
            initiated_by,
            created_at,
        };
        let credit = Self {
            id: TransactionId::new(),
            account_id: destination,
            kind: TransactionKind::Transfer,
            direction: EntryDirection::Credit,
            amount,
            source_account: Some(source),
            destination_account: Some(destination),
            transfer_id: Some(transfer_id),
            note: Some(credit_note),
            status: TransactionStatus::Success,
            initiated_by,
            created_at,
        };

        (debit, credit)
    }

    /// Returns true if the row is committed and visible.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == TransactionStatus::Success
    }

    /// Returns true if the row references `account` in any role.
    ///
    /// Used for referential-integrity checks: an account referenced by any
    /// row must not be deleted.
    #[must_use]
    pub fn references(&self, account: AccountId) -> bool {
        self.account_id == account
            || self.source_account == Some(account)
            || self.destination_account == Some(account)
    }
}
