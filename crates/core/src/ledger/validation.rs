//! Intent validation: structural and financial legality.
//!
//! Rules run in a fixed order and the first failure wins:
//! 1. amount present and strictly positive;
//! 2. transfer: both accounts present and distinct;
//! 3. deposit/withdrawal: no counterpart account fields, target present;
//! 4. sufficiency for the paying account. Sufficiency depends on state,
//!    so it is only authoritative when evaluated under the orchestrator's
//!    lock via [`check_funds`]. Any earlier pass is advisory.

use passbook_shared::types::Money;

use super::error::LedgerError;
use super::intent::{TransactionIntent, ValidatedIntent};
use super::transaction::TransactionKind;

/// Validates the structural rules (1-3) of an intent.
///
/// # Errors
///
/// Returns the first failing rule's error: `InvalidAmount`,
/// `MissingAccount`, `SameAccount` or `MalformedIntent`.
pub fn validate(intent: &TransactionIntent) -> Result<ValidatedIntent, LedgerError> {
    // Rule 1: amount present and strictly positive.
    let amount = intent
        .amount
        .ok_or_else(|| LedgerError::InvalidAmount("amount is required".to_string()))?
        .require_positive()?;

    match intent.kind {
        // Rule 2: transfers need two distinct accounts.
        TransactionKind::Transfer => {
            let source = intent.source.ok_or(LedgerError::MissingAccount)?;
            let destination = intent.destination.ok_or(LedgerError::MissingAccount)?;
            if source == destination {
                return Err(LedgerError::SameAccount);
            }
            Ok(ValidatedIntent::Transfer {
                source,
                destination,
                amount,
                note: intent.note.clone(),
            })
        }
        // Rule 3: single-account intents must not carry counterpart fields.
        TransactionKind::Deposit | TransactionKind::Withdrawal => {
            if intent.source.is_some() || intent.destination.is_some() {
                return Err(LedgerError::MalformedIntent(
                    "deposit/withdrawal must not carry counterpart account fields",
                ));
            }
            let account = intent.account.ok_or(LedgerError::MissingAccount)?;
            match intent.kind {
                TransactionKind::Deposit => Ok(ValidatedIntent::Deposit {
                    account,
                    amount,
                    note: intent.note.clone(),
                }),
                _ => Ok(ValidatedIntent::Withdrawal {
                    account,
                    amount,
                    note: intent.note.clone(),
                }),
            }
        }
    }
}

/// Rule 4: financial sufficiency of the paying account.
///
/// Only meaningful when `available` was read under the commit lock.
///
/// # Errors
///
/// Returns `InsufficientBalance` with both figures when `available` cannot
/// cover `required`.
pub fn check_funds(available: Money, required: Money) -> Result<(), LedgerError> {
    if available < required {
        return Err(LedgerError::InsufficientBalance {
            available,
            required,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use passbook_shared::types::AccountId;
    use rstest::rstest;

    fn money(s: &str) -> Money {
        Money::parse(s).unwrap()
    }

    #[test]
    fn test_missing_amount_is_invalid_amount() {
        let mut intent = TransactionIntent::deposit(AccountId::new(), money("1.00"), None);
        intent.amount = None;
        assert!(matches!(
            validate(&intent),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_zero_amount_is_invalid() {
        let intent = TransactionIntent::deposit(AccountId::new(), Money::zero(), None);
        assert!(matches!(
            validate(&intent),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[rstest]
    #[case(TransactionKind::Deposit)]
    #[case(TransactionKind::Withdrawal)]
    fn test_counterpart_fields_are_malformed(#[case] kind: TransactionKind) {
        let intent = TransactionIntent {
            kind,
            account: Some(AccountId::new()),
            source: Some(AccountId::new()),
            destination: None,
            amount: Some(money("1.00")),
            note: None,
        };
        assert!(matches!(
            validate(&intent),
            Err(LedgerError::MalformedIntent(_))
        ));
    }

    #[test]
    fn test_deposit_without_account_is_missing_account() {
        let intent = TransactionIntent {
            kind: TransactionKind::Deposit,
            account: None,
            source: None,
            destination: None,
            amount: Some(money("1.00")),
            note: None,
        };
        assert_eq!(validate(&intent), Err(LedgerError::MissingAccount));
    }

    #[test]
    fn test_transfer_missing_either_account() {
        let base = TransactionIntent {
            kind: TransactionKind::Transfer,
            account: None,
            source: None,
            destination: Some(AccountId::new()),
            amount: Some(money("1.00")),
            note: None,
        };
        assert_eq!(validate(&base), Err(LedgerError::MissingAccount));

        let other = TransactionIntent {
            source: Some(AccountId::new()),
            destination: None,
            ..base
        };
        assert_eq!(validate(&other), Err(LedgerError::MissingAccount));
    }

    #[test]
    fn test_self_transfer_is_same_account() {
        let account = AccountId::new();
        let intent = TransactionIntent::transfer(account, account, money("1.00"), None);
        assert_eq!(validate(&intent), Err(LedgerError::SameAccount));
    }

    #[test]
    fn test_amount_rule_beats_account_rules() {
        // Rule 1 fires before rule 2 even when both are violated.
        let account = AccountId::new();
        let mut intent = TransactionIntent::transfer(account, account, money("1.00"), None);
        intent.amount = None;
        assert!(matches!(
            validate(&intent),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_valid_transfer_passes() {
        let source = AccountId::new();
        let destination = AccountId::new();
        let intent =
            TransactionIntent::transfer(source, destination, money("10.00"), Some("rent".into()));
        let validated = validate(&intent).unwrap();
        assert_eq!(
            validated,
            ValidatedIntent::Transfer {
                source,
                destination,
                amount: money("10.00"),
                note: Some("rent".into()),
            }
        );
    }

    #[test]
    fn test_check_funds_boundary() {
        assert!(check_funds(money("100.00"), money("100.00")).is_ok());
        assert!(check_funds(money("100.01"), money("100.00")).is_ok());
        let err = check_funds(money("100.00"), money("100.01")).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                available: money("100.00"),
                required: money("100.01"),
            }
        );
    }
}
