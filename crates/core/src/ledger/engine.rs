//! The ledger engine facade.
//!
//! Composes validation and orchestration into the public operations:
//! deposit, withdraw, transfer, balance and history. All mutations flow
//! through the validate-then-commit protocol; the facade never writes
//! rows directly.

use chrono::{DateTime, Utc};
use passbook_shared::LedgerConfig;
use passbook_shared::types::{AccountId, Money, PageRequest, PageResponse, UserId};
use tracing::warn;

use super::balance::balance_for;
use super::error::LedgerError;
use super::intent::TransactionIntent;
use super::orchestrator::{CommitReceipt, Orchestrator};
use super::store::LedgerStore;
use super::transaction::{Transaction, TransactionKind, TransactionStatus};
use super::validation::validate;

/// Result of a committed deposit.
#[derive(Debug, Clone)]
pub struct DepositOutcome {
    /// The committed row.
    pub transaction: Transaction,
    /// Account balance after the commit, computed under the commit lock.
    pub new_balance: Money,
}

/// Result of a committed withdrawal.
#[derive(Debug, Clone)]
pub struct WithdrawalOutcome {
    /// The committed row.
    pub transaction: Transaction,
    /// Account balance after the commit, computed under the commit lock.
    pub new_balance: Money,
}

/// Result of a committed transfer.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// The debit leg, owned by the source account's history.
    pub debit_transaction: Transaction,
    /// The credit leg, owned by the destination account's history.
    pub credit_transaction: Transaction,
    /// Source balance after the commit.
    pub source_balance: Money,
    /// Destination balance after the commit.
    pub destination_balance: Money,
}

/// Filters for history queries.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    /// Restrict to one transaction kind.
    pub kind: Option<TransactionKind>,
    /// Restrict to one status. `None` means Success, the only status a
    /// committed history contains.
    pub status: Option<TransactionStatus>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<DateTime<Utc>>,
    /// Page to return; defaults to the configured first page.
    pub page: Option<PageRequest>,
}

/// The ledger engine facade.
///
/// Holds no in-process shared mutable state; all shared state lives in
/// the store, so the engine tolerates true parallel invocation. The
/// `caller` on every mutation is the explicit authorized-caller context
/// supplied by the authentication layer above; the engine records it but
/// checks only financial and structural legality.
pub struct LedgerEngine<S: LedgerStore> {
    store: S,
    config: LedgerConfig,
}

impl<S: LedgerStore> LedgerEngine<S> {
    /// Creates an engine over `store`.
    #[must_use]
    pub const fn new(store: S, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Deposits `amount` into `account`.
    ///
    /// # Errors
    ///
    /// `InvalidAmount`, `AccountNotFound`, or a retryable commit failure
    /// once the retry budget is exhausted.
    pub async fn deposit(
        &self,
        caller: UserId,
        account: AccountId,
        amount: Money,
        note: Option<String>,
    ) -> Result<DepositOutcome, LedgerError> {
        let intent = TransactionIntent::deposit(account, amount, note);
        let CommitReceipt::Single {
            transaction,
            new_balance,
        } = self.commit_with_retry(&intent, caller).await?
        else {
            return Err(LedgerError::StorageFailure(
                "deposit produced a transfer receipt".to_string(),
            ));
        };
        Ok(DepositOutcome {
            transaction,
            new_balance,
        })
    }

    /// Withdraws `amount` from `account`.
    ///
    /// # Errors
    ///
    /// `InvalidAmount`, `InsufficientBalance`, `AccountNotFound`, or a
    /// retryable commit failure once the retry budget is exhausted.
    pub async fn withdraw(
        &self,
        caller: UserId,
        account: AccountId,
        amount: Money,
        note: Option<String>,
    ) -> Result<WithdrawalOutcome, LedgerError> {
        let intent = TransactionIntent::withdrawal(account, amount, note);
        let CommitReceipt::Single {
            transaction,
            new_balance,
        } = self.commit_with_retry(&intent, caller).await?
        else {
            return Err(LedgerError::StorageFailure(
                "withdrawal produced a transfer receipt".to_string(),
            ));
        };
        Ok(WithdrawalOutcome {
            transaction,
            new_balance,
        })
    }

    /// Transfers `amount` from `source` to `destination` as one atomic
    /// dual-leg commit.
    ///
    /// # Errors
    ///
    /// `InvalidAmount`, `SameAccount`, `MissingAccount`,
    /// `InsufficientBalance`, `AccountNotFound`, or a retryable commit
    /// failure once the retry budget is exhausted.
    pub async fn transfer(
        &self,
        caller: UserId,
        source: AccountId,
        destination: AccountId,
        amount: Money,
        note: Option<String>,
    ) -> Result<TransferOutcome, LedgerError> {
        let intent = TransactionIntent::transfer(source, destination, amount, note);
        let CommitReceipt::Pair {
            debit,
            credit,
            source_balance,
            destination_balance,
        } = self.commit_with_retry(&intent, caller).await?
        else {
            return Err(LedgerError::StorageFailure(
                "transfer produced a single-row receipt".to_string(),
            ));
        };
        Ok(TransferOutcome {
            debit_transaction: debit,
            credit_transaction: credit,
            source_balance,
            destination_balance,
        })
    }

    /// Derives `account`'s balance, optionally as of a point in time.
    ///
    /// Unlocked read: suitable for display, not for sufficiency decisions
    /// (those happen inside the commit protocol).
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if the account does not exist.
    pub async fn balance(
        &self,
        account: AccountId,
        as_of: Option<DateTime<Utc>>,
    ) -> Result<Money, LedgerError> {
        self.store
            .find_account(account)
            .await?
            .ok_or(LedgerError::AccountNotFound(account))?;
        let rows = self.store.transactions_for(account).await?;
        Ok(balance_for(account, &rows, as_of))
    }

    /// Lists `account`'s history, newest first, filtered and paginated.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` if the account does not exist.
    pub async fn history(
        &self,
        account: AccountId,
        filter: HistoryFilter,
    ) -> Result<PageResponse<Transaction>, LedgerError> {
        self.store
            .find_account(account)
            .await?
            .ok_or(LedgerError::AccountNotFound(account))?;
        let rows = self.store.transactions_for(account).await?;

        let status = filter.status.unwrap_or(TransactionStatus::Success);
        let mut matching: Vec<Transaction> = rows
            .into_iter()
            .filter(|row| row.status == status)
            .filter(|row| filter.kind.is_none_or(|kind| row.kind == kind))
            .filter(|row| filter.from.is_none_or(|from| row.created_at >= from))
            .filter(|row| filter.to.is_none_or(|to| row.created_at <= to))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let page = filter.page.unwrap_or(PageRequest {
            page: 1,
            per_page: self.config.history.default_per_page,
        });
        let total = matching.len() as u64;
        let data: Vec<Transaction> = matching
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .collect();

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Validates the intent, then commits it; retryable failures retry
    /// the whole intent (fresh locks, fresh validation reads) within the
    /// configured budget.
    async fn commit_with_retry(
        &self,
        intent: &TransactionIntent,
        caller: UserId,
    ) -> Result<CommitReceipt, LedgerError> {
        let validated = validate(intent)?;
        let orchestrator = Orchestrator::new(&self.store);
        let max_attempts = self.config.retry.max_attempts.max(1);

        let mut attempt = 0;
        loop {
            attempt += 1;
            match orchestrator.commit(validated.clone(), caller).await {
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    warn!(
                        code = err.error_code(),
                        attempt,
                        max_attempts,
                        "retrying intent after transient failure"
                    );
                }
                other => return other,
            }
        }
    }
}
