//! Ledger error types for validation, commit and storage failures.

use passbook_shared::types::{AccountId, Money, MoneyError};
use thiserror::Error;

/// Errors that can occur during ledger operations.
///
/// Validation errors are deterministic caller mistakes and are never
/// retried. Lock and storage errors are transient; the engine retries the
/// whole intent within a bounded budget before surfacing them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Amount is missing, unparseable, zero or negative.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Transfer source and destination are the same account.
    #[error("Cannot transfer to the same account")]
    SameAccount,

    /// A required account reference is missing from the intent.
    #[error("Required account reference is missing")]
    MissingAccount,

    /// The intent carries fields its kind does not allow.
    #[error("Malformed intent: {0}")]
    MalformedIntent(&'static str),

    /// The paying account cannot cover the amount.
    #[error("Insufficient balance. Available: {available}, Required: {required}")]
    InsufficientBalance {
        /// Balance available at validation time, read under lock.
        available: Money,
        /// Amount the intent needs.
        required: Money,
    },

    /// Account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    // ========== Commit / Storage Errors ==========
    /// Could not lock every involved account within the wait budget.
    #[error("Could not lock all accounts within the wait budget, please retry")]
    LockConflict,

    /// The storage layer failed; the in-flight unit was rolled back.
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::SameAccount => "SAME_ACCOUNT",
            Self::MissingAccount => "MISSING_ACCOUNT",
            Self::MalformedIntent(_) => "MALFORMED_INTENT",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::LockConflict => "LOCK_CONFLICT",
            Self::StorageFailure(_) => "STORAGE_FAILURE",
        }
    }

    /// Returns true if retrying the whole intent may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::LockConflict | Self::StorageFailure(_))
    }
}

impl From<MoneyError> for LedgerError {
    fn from(err: MoneyError) -> Self {
        match err {
            MoneyError::InvalidAmount(reason) => Self::InvalidAmount(reason),
        }
    }
}
