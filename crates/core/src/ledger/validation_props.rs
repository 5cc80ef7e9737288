//! Property tests for intent validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use passbook_shared::types::{AccountId, Money};
use uuid::Uuid;

use super::error::LedgerError;
use super::intent::TransactionIntent;
use super::transaction::TransactionKind;
use super::validation::{check_funds, validate};

/// Strategy for strictly positive two-decimal amounts.
fn positive_amount() -> impl Strategy<Value = Money> {
    (1i64..1_000_000_000i64).prop_map(|n| Money::new(Decimal::new(n, 2)))
}

/// Strategy for zero-or-negative two-decimal amounts.
fn non_positive_amount() -> impl Strategy<Value = Money> {
    (-1_000_000_000i64..=0i64).prop_map(|n| Money::new(Decimal::new(n, 2)))
}

fn account_id() -> impl Strategy<Value = AccountId> {
    any::<u128>().prop_map(|n| AccountId::from_uuid(Uuid::from_u128(n)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any positive amount between two distinct accounts validates.
    #[test]
    fn prop_distinct_transfer_validates(
        amount in positive_amount(),
        a in account_id(),
        b in account_id(),
    ) {
        prop_assume!(a != b);
        let intent = TransactionIntent::transfer(a, b, amount, None);
        prop_assert!(validate(&intent).is_ok());
    }

    /// A non-positive amount is rejected no matter which fields are set.
    #[test]
    fn prop_non_positive_amount_always_rejected(
        amount in non_positive_amount(),
        a in account_id(),
        b in account_id(),
        kind_pick in 0u8..3,
    ) {
        let intent = match kind_pick {
            0 => TransactionIntent::deposit(a, amount, None),
            1 => TransactionIntent::withdrawal(a, amount, None),
            _ => TransactionIntent::transfer(a, b, amount, None),
        };
        prop_assert!(matches!(
            validate(&intent),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    /// Self-transfer is always `SameAccount`, never anything else.
    #[test]
    fn prop_self_transfer_always_same_account(
        amount in positive_amount(),
        account in account_id(),
    ) {
        let intent = TransactionIntent::transfer(account, account, amount, None);
        prop_assert_eq!(validate(&intent), Err(LedgerError::SameAccount));
    }

    /// The amount rule fires before account rules (first failure wins).
    #[test]
    fn prop_amount_rule_has_priority(
        amount in non_positive_amount(),
        account in account_id(),
    ) {
        // Both rule 1 (amount) and rule 2 (same account) are violated.
        let intent = TransactionIntent::transfer(account, account, amount, None);
        prop_assert!(matches!(
            validate(&intent),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    /// Validation is deterministic.
    #[test]
    fn prop_validation_deterministic(
        amount in positive_amount(),
        a in account_id(),
        b in account_id(),
    ) {
        let intent = TransactionIntent::transfer(a, b, amount, None);
        prop_assert_eq!(validate(&intent), validate(&intent));
    }

    /// Sufficiency holds exactly when available >= required.
    #[test]
    fn prop_check_funds_is_ge(
        available in positive_amount(),
        required in positive_amount(),
    ) {
        let result = check_funds(available, required);
        if available >= required {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(
                result,
                Err(LedgerError::InsufficientBalance { available, required })
            );
        }
    }

    /// Deposits and withdrawals reject counterpart account fields.
    #[test]
    fn prop_counterpart_fields_rejected(
        amount in positive_amount(),
        a in account_id(),
        b in account_id(),
        deposit in any::<bool>(),
    ) {
        let intent = TransactionIntent {
            kind: if deposit {
                TransactionKind::Deposit
            } else {
                TransactionKind::Withdrawal
            },
            account: Some(a),
            source: None,
            destination: Some(b),
            amount: Some(amount),
            note: None,
        };
        prop_assert!(matches!(
            validate(&intent),
            Err(LedgerError::MalformedIntent(_))
        ));
    }
}
