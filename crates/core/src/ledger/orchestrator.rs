//! Commit orchestration: lock, re-validate, write, commit as one unit.
//!
//! Every mutation runs the same state machine:
//! `Received -> Locked -> Validated -> Written -> Committed`, or
//! `-> Rejected` (validation failure, nothing written) or `-> Aborted`
//! (storage failure, unit rolled back, retryable). Sufficiency is checked
//! against state read under the lock, which closes the race where two
//! concurrent withdrawals both observe enough balance before either
//! commits.

use chrono::Utc;
use passbook_shared::types::{AccountId, Money, UserId};
use tracing::{debug, info, warn};

use super::balance::balance_for;
use super::error::LedgerError;
use super::intent::ValidatedIntent;
use super::store::{LedgerStore, StoreUnit};
use super::transaction::Transaction;
use super::validation::check_funds;

/// The outcome of a committed intent, including each involved account's
/// post-commit balance computed under the same lock.
#[derive(Debug, Clone)]
pub enum CommitReceipt {
    /// A deposit or withdrawal: one row.
    Single {
        /// The committed row.
        transaction: Transaction,
        /// Balance of the account after this commit.
        new_balance: Money,
    },
    /// A transfer: the correlated leg pair.
    Pair {
        /// The committed debit leg (source account's history).
        debit: Transaction,
        /// The committed credit leg (destination account's history).
        credit: Transaction,
        /// Source balance after this commit.
        source_balance: Money,
        /// Destination balance after this commit.
        destination_balance: Money,
    },
}

/// Post-commit balances captured while the rows were still staged.
enum Staged {
    Single { new_balance: Money },
    Pair {
        source_balance: Money,
        destination_balance: Money,
    },
}

/// Commits validated intents against a ledger store.
///
/// Holds no state of its own; all shared state lives in the store. Only
/// this type writes transaction rows, and only while holding the locks of
/// every involved account.
pub struct Orchestrator<'a, S: LedgerStore> {
    store: &'a S,
}

impl<'a, S: LedgerStore> Orchestrator<'a, S> {
    /// Creates an orchestrator over `store`.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Runs the commit state machine for one validated intent.
    ///
    /// # Errors
    ///
    /// Returns a validation error (Rejected: nothing written, unit rolled
    /// back) or a retryable `LockConflict`/`StorageFailure` (Aborted: unit
    /// rolled back, caller may retry the whole intent).
    pub async fn commit(
        &self,
        intent: ValidatedIntent,
        initiated_by: UserId,
    ) -> Result<CommitReceipt, LedgerError> {
        let lock_order = intent.lock_order();
        let mut unit = self.store.begin(&lock_order).await?;
        debug!(accounts = lock_order.len(), "accounts locked");

        match Self::validate_and_stage(&mut unit, &intent, initiated_by).await {
            Ok(staged) => {
                let rows = unit.commit().await?;
                info!(rows = rows.len(), "intent committed");
                Self::receipt(rows, staged)
            }
            Err(err) => {
                warn!(code = err.error_code(), "intent rejected under lock");
                if let Err(rollback_err) = unit.rollback().await {
                    warn!(error = %rollback_err, "rollback after rejection failed");
                }
                Err(err)
            }
        }
    }

    /// Re-validates against under-lock state and stages the row(s).
    async fn validate_and_stage(
        unit: &mut S::Unit,
        intent: &ValidatedIntent,
        initiated_by: UserId,
    ) -> Result<Staged, LedgerError> {
        let now = Utc::now();
        match intent {
            ValidatedIntent::Deposit {
                account,
                amount,
                note,
            } => {
                let balance = Self::locked_balance(unit, *account).await?;
                unit.stage(Transaction::deposit(
                    *account,
                    *amount,
                    note.clone(),
                    initiated_by,
                    now,
                ));
                debug!("deposit staged");
                Ok(Staged::Single {
                    new_balance: balance + *amount,
                })
            }
            ValidatedIntent::Withdrawal {
                account,
                amount,
                note,
            } => {
                let balance = Self::locked_balance(unit, *account).await?;
                check_funds(balance, *amount)?;
                unit.stage(Transaction::withdrawal(
                    *account,
                    *amount,
                    note.clone(),
                    initiated_by,
                    now,
                ));
                debug!("withdrawal staged");
                Ok(Staged::Single {
                    new_balance: balance - *amount,
                })
            }
            ValidatedIntent::Transfer {
                source,
                destination,
                amount,
                note,
            } => {
                let source_balance = Self::locked_balance(unit, *source).await?;
                let destination_balance = Self::locked_balance(unit, *destination).await?;
                check_funds(source_balance, *amount)?;

                let (debit, credit) = Transaction::transfer_pair(
                    *source,
                    *destination,
                    *amount,
                    note.clone(),
                    initiated_by,
                    now,
                );
                unit.stage(debit);
                unit.stage(credit);
                debug!("transfer legs staged");
                Ok(Staged::Pair {
                    source_balance: source_balance - *amount,
                    destination_balance: destination_balance + *amount,
                })
            }
        }
    }

    /// Reads an account's balance through the unit, under its locks.
    async fn locked_balance(unit: &S::Unit, account: AccountId) -> Result<Money, LedgerError> {
        unit.account(account)
            .await?
            .ok_or(LedgerError::AccountNotFound(account))?;
        let rows = unit.transactions(account).await?;
        Ok(balance_for(account, &rows, None))
    }

    /// Pairs committed rows back up with the staged balances.
    fn receipt(rows: Vec<Transaction>, staged: Staged) -> Result<CommitReceipt, LedgerError> {
        let mut rows = rows.into_iter();
        match staged {
            Staged::Single { new_balance } => {
                let transaction = rows.next().ok_or_else(|| {
                    LedgerError::StorageFailure("commit returned no rows".to_string())
                })?;
                Ok(CommitReceipt::Single {
                    transaction,
                    new_balance,
                })
            }
            Staged::Pair {
                source_balance,
                destination_balance,
            } => {
                let (Some(debit), Some(credit)) = (rows.next(), rows.next()) else {
                    return Err(LedgerError::StorageFailure(
                        "commit returned fewer rows than staged".to_string(),
                    ));
                };
                Ok(CommitReceipt::Pair {
                    debit,
                    credit,
                    source_balance,
                    destination_balance,
                })
            }
        }
    }
}
