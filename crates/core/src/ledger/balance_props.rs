//! Property tests for the balance projection.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use passbook_shared::types::{AccountId, Money, UserId};

use super::balance::{AccountBalance, balance_for};
use super::transaction::Transaction;

/// Strategy for strictly positive two-decimal amounts.
fn positive_amount() -> impl Strategy<Value = Money> {
    (1i64..1_000_000i64).prop_map(|n| Money::new(Decimal::new(n, 2)))
}

/// A random mix of deposits and withdrawals on one account, expressed as
/// (is_deposit, amount) pairs.
fn movements() -> impl Strategy<Value = Vec<(bool, Money)>> {
    prop::collection::vec((any::<bool>(), positive_amount()), 0..40)
}

fn rows_for(account: AccountId, moves: &[(bool, Money)]) -> Vec<Transaction> {
    let caller = UserId::new();
    let now = Utc::now();
    moves
        .iter()
        .map(|&(is_deposit, amount)| {
            if is_deposit {
                Transaction::deposit(account, amount, None, caller, now)
            } else {
                Transaction::withdrawal(account, amount, None, caller, now)
            }
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The projection equals deposits minus withdrawals, exactly.
    #[test]
    fn prop_projection_equals_signed_sum(moves in movements()) {
        let account = AccountId::new();
        let rows = rows_for(account, &moves);

        let expected = moves.iter().fold(Money::zero(), |acc, &(is_deposit, amount)| {
            if is_deposit { acc + amount } else { acc - amount }
        });
        prop_assert_eq!(balance_for(account, &rows, None), expected);
    }

    /// Row order never changes the projection.
    #[test]
    fn prop_projection_is_order_independent(moves in movements()) {
        let account = AccountId::new();
        let rows = rows_for(account, &moves);
        let mut reversed = rows.clone();
        reversed.reverse();

        prop_assert_eq!(
            balance_for(account, &rows, None),
            balance_for(account, &reversed, None)
        );
    }

    /// Projecting twice from the same history is bit-for-bit identical.
    #[test]
    fn prop_projection_is_idempotent(moves in movements()) {
        let account = AccountId::new();
        let rows = rows_for(account, &moves);

        let first = AccountBalance::project(account, &rows, None);
        let second = AccountBalance::project(account, &rows, None);
        prop_assert_eq!(first, second);
    }

    /// A transfer conserves money: the sum of both balances is unchanged.
    #[test]
    fn prop_transfer_conserves_money(
        source_moves in movements(),
        destination_moves in movements(),
        amount in positive_amount(),
    ) {
        let source = AccountId::new();
        let destination = AccountId::new();
        let mut rows = rows_for(source, &source_moves);
        rows.extend(rows_for(destination, &destination_moves));

        let before =
            balance_for(source, &rows, None) + balance_for(destination, &rows, None);

        let (debit, credit) = Transaction::transfer_pair(
            source,
            destination,
            amount,
            None,
            UserId::new(),
            Utc::now(),
        );
        rows.push(debit);
        rows.push(credit);

        let after =
            balance_for(source, &rows, None) + balance_for(destination, &rows, None);
        prop_assert_eq!(before, after);
    }

    /// A transfer moves exactly `amount` between the two balances.
    #[test]
    fn prop_transfer_moves_exact_amount(
        source_moves in movements(),
        amount in positive_amount(),
    ) {
        let source = AccountId::new();
        let destination = AccountId::new();
        let mut rows = rows_for(source, &source_moves);

        let source_before = balance_for(source, &rows, None);
        let destination_before = balance_for(destination, &rows, None);

        let (debit, credit) = Transaction::transfer_pair(
            source,
            destination,
            amount,
            None,
            UserId::new(),
            Utc::now(),
        );
        rows.push(debit);
        rows.push(credit);

        prop_assert_eq!(balance_for(source, &rows, None), source_before - amount);
        prop_assert_eq!(
            balance_for(destination, &rows, None),
            destination_before + amount
        );
    }
}
