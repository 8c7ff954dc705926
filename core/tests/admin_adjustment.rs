//! Administrative balance adjustment tests.
//!
//! Tests cover: audited awards and deductions, the zero floor, amount
//! validation, and configured fallback descriptions.

use connect_core::config::EconomyConfig;
use connect_core::economy::TokenEconomy;
use connect_core::error::EconomyError;
use connect_core::ledger::TransactionKind;

fn economy_with_user(user_id: &str, name: &str) -> TokenEconomy {
    let mut economy =
        TokenEconomy::in_memory(EconomyConfig::default_test()).expect("build in-memory economy");
    economy.register_user(user_id, name).expect("register user");
    economy
}

#[test]
fn awards_are_credited_and_audited() {
    let mut economy = economy_with_user("user-tess", "Tess Okafor");

    let update = economy
        .award_tokens("admin-rivera", "user-tess", 100, Some("Hackathon helper prize"))
        .unwrap();
    assert_eq!(update.new_balance, 100);
    assert_eq!(economy.balance("user-tess").unwrap(), 100);

    let entry = &economy.transactions_for_user("user-tess", 1).unwrap()[0];
    assert_eq!(entry.amount, 100);
    assert_eq!(entry.kind, TransactionKind::Bonus);
    assert_eq!(entry.description, "Hackathon helper prize");
    assert_eq!(entry.actor_id.as_deref(), Some("admin-rivera"));
}

#[test]
fn deductions_are_audited_and_floored_at_zero() {
    let mut economy = economy_with_user("user-tess", "Tess Okafor");
    economy.award_tokens("admin-rivera", "user-tess", 80, None).unwrap();

    let update = economy
        .deduct_tokens("admin-rivera", "user-tess", 30, Some("Duplicate session credit"))
        .unwrap();
    assert_eq!(update.new_balance, 50);
    assert_eq!(update.transaction.amount, -30, "deductions land as negative entries");
    assert_eq!(update.transaction.kind, TransactionKind::AdminAdjust);
    assert_eq!(update.transaction.actor_id.as_deref(), Some("admin-rivera"));

    let err = economy
        .deduct_tokens("admin-rivera", "user-tess", 60, None)
        .unwrap_err();
    assert!(
        matches!(err, EconomyError::InsufficientBalance { balance: 50, required: 60 }),
        "got {err}"
    );
    assert_eq!(economy.balance("user-tess").unwrap(), 50);
    assert_eq!(
        economy.store.transaction_count("user-tess").unwrap(),
        2,
        "the rejected deduction wrote nothing"
    );
}

#[test]
fn non_positive_amounts_are_invalid() {
    let mut economy = economy_with_user("user-tess", "Tess Okafor");

    for amount in [0, -25] {
        let err = economy
            .award_tokens("admin-rivera", "user-tess", amount, None)
            .unwrap_err();
        assert!(matches!(err, EconomyError::InvalidAmount { .. }), "got {err}");

        let err = economy
            .deduct_tokens("admin-rivera", "user-tess", amount, None)
            .unwrap_err();
        assert!(matches!(err, EconomyError::InvalidAmount { .. }), "got {err}");
    }
    assert_eq!(economy.store.transaction_count("user-tess").unwrap(), 0);
}

#[test]
fn missing_reason_falls_back_to_configured_description() {
    let mut economy = economy_with_user("user-tess", "Tess Okafor");

    let award = economy.award_tokens("admin-rivera", "user-tess", 40, None).unwrap();
    assert_eq!(
        award.transaction.description,
        economy.config.default_award_description
    );

    let deduction = economy.deduct_tokens("admin-rivera", "user-tess", 15, None).unwrap();
    assert_eq!(
        deduction.transaction.description,
        economy.config.default_deduction_description
    );
}

#[test]
fn adjustments_for_unknown_users_are_rejected() {
    let mut economy = economy_with_user("user-tess", "Tess Okafor");

    let err = economy
        .award_tokens("admin-rivera", "user-ghost", 50, None)
        .unwrap_err();
    assert!(matches!(err, EconomyError::UserNotFound { .. }), "got {err}");

    let err = economy
        .deduct_tokens("admin-rivera", "user-ghost", 50, None)
        .unwrap_err();
    assert!(matches!(err, EconomyError::UserNotFound { .. }), "got {err}");
}
