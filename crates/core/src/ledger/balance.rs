//! Balance projection from transaction history.
//!
//! Balance is a pure fold over the account's committed rows: credits in,
//! debits out, optionally cut at a point in time. No cache is
//! authoritative; any cached figure must equal this recomputation.

use chrono::{DateTime, Utc};
use passbook_shared::types::{AccountId, Money};
use serde::{Deserialize, Serialize};

use super::transaction::{EntryDirection, Transaction};

/// An account's balance projection at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account projected.
    pub account_id: AccountId,
    /// Sum of Success credits into the account.
    pub credit_total: Money,
    /// Sum of Success debits out of the account.
    pub debit_total: Money,
    /// Net balance (credits minus debits).
    pub balance: Money,
}

impl AccountBalance {
    /// Projects the balance of `account_id` from `rows`.
    ///
    /// Only rows owned by the account (its own history legs) with status
    /// Success count, restricted to `created_at <= as_of` when a cutoff is
    /// given. Side-effect free: the same inputs always produce the same
    /// projection.
    #[must_use]
    pub fn project(
        account_id: AccountId,
        rows: &[Transaction],
        as_of: Option<DateTime<Utc>>,
    ) -> Self {
        let mut credit_total = Money::zero();
        let mut debit_total = Money::zero();

        for row in rows {
            if row.account_id != account_id || !row.is_success() {
                continue;
            }
            if let Some(cutoff) = as_of {
                if row.created_at > cutoff {
                    continue;
                }
            }
            match row.direction {
                EntryDirection::Credit => credit_total += row.amount,
                EntryDirection::Debit => debit_total += row.amount,
            }
        }

        Self {
            account_id,
            credit_total,
            debit_total,
            balance: credit_total - debit_total,
        }
    }
}

/// Convenience: the net balance of `account_id` from `rows`.
#[must_use]
pub fn balance_for(
    account_id: AccountId,
    rows: &[Transaction],
    as_of: Option<DateTime<Utc>>,
) -> Money {
    AccountBalance::project(account_id, rows, as_of).balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::transaction::TransactionStatus;
    use chrono::Duration;
    use passbook_shared::types::UserId;
    use rust_decimal_macros::dec;

    fn money(s: &str) -> Money {
        Money::parse(s).unwrap()
    }

    #[test]
    fn test_empty_history_is_zero() {
        let account = AccountId::new();
        assert_eq!(balance_for(account, &[], None), Money::zero());
    }

    #[test]
    fn test_credits_minus_debits() {
        let account = AccountId::new();
        let caller = UserId::new();
        let now = Utc::now();
        let rows = vec![
            Transaction::deposit(account, money("100.00"), None, caller, now),
            Transaction::deposit(account, money("50.00"), None, caller, now),
            Transaction::withdrawal(account, money("30.00"), None, caller, now),
        ];

        let projection = AccountBalance::project(account, &rows, None);
        assert_eq!(projection.credit_total.amount(), dec!(150.00));
        assert_eq!(projection.debit_total.amount(), dec!(30.00));
        assert_eq!(projection.balance.amount(), dec!(120.00));
    }

    #[test]
    fn test_other_accounts_rows_do_not_count() {
        let account = AccountId::new();
        let other = AccountId::new();
        let caller = UserId::new();
        let now = Utc::now();
        let rows = vec![
            Transaction::deposit(account, money("10.00"), None, caller, now),
            Transaction::deposit(other, money("99.00"), None, caller, now),
        ];
        assert_eq!(balance_for(account, &rows, None).amount(), dec!(10.00));
    }

    #[test]
    fn test_transfer_legs_count_once_per_side() {
        let source = AccountId::new();
        let destination = AccountId::new();
        let caller = UserId::new();
        let now = Utc::now();
        let mut rows = vec![Transaction::deposit(source, money("100.00"), None, caller, now)];
        let (debit, credit) =
            Transaction::transfer_pair(source, destination, money("40.00"), None, caller, now);
        rows.push(debit);
        rows.push(credit);

        assert_eq!(balance_for(source, &rows, None).amount(), dec!(60.00));
        assert_eq!(balance_for(destination, &rows, None).amount(), dec!(40.00));
    }

    #[test]
    fn test_non_success_rows_never_aggregate() {
        let account = AccountId::new();
        let caller = UserId::new();
        let now = Utc::now();
        let mut pending = Transaction::deposit(account, money("500.00"), None, caller, now);
        pending.status = TransactionStatus::Pending;
        let mut failed = Transaction::withdrawal(account, money("400.00"), None, caller, now);
        failed.status = TransactionStatus::Failed;
        let rows = vec![
            pending,
            failed,
            Transaction::deposit(account, money("25.00"), None, caller, now),
        ];
        assert_eq!(balance_for(account, &rows, None).amount(), dec!(25.00));
    }

    #[test]
    fn test_as_of_cutoff_is_inclusive() {
        let account = AccountId::new();
        let caller = UserId::new();
        let t0 = Utc::now();
        let t1 = t0 + Duration::hours(1);
        let t2 = t0 + Duration::hours(2);
        let rows = vec![
            Transaction::deposit(account, money("10.00"), None, caller, t0),
            Transaction::deposit(account, money("20.00"), None, caller, t1),
            Transaction::deposit(account, money("40.00"), None, caller, t2),
        ];

        assert_eq!(balance_for(account, &rows, Some(t1)).amount(), dec!(30.00));
        assert_eq!(balance_for(account, &rows, Some(t0)).amount(), dec!(10.00));
        assert_eq!(
            balance_for(account, &rows, Some(t0 - Duration::seconds(1))),
            Money::zero()
        );
        assert_eq!(balance_for(account, &rows, None).amount(), dec!(70.00));
    }

    #[test]
    fn test_projection_is_idempotent() {
        let account = AccountId::new();
        let caller = UserId::new();
        let now = Utc::now();
        let rows = vec![
            Transaction::deposit(account, money("12.34"), None, caller, now),
            Transaction::withdrawal(account, money("2.34"), None, caller, now),
        ];
        let first = AccountBalance::project(account, &rows, None);
        let second = AccountBalance::project(account, &rows, None);
        assert_eq!(first, second);
    }
}
