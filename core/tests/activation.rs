//! Reward activation tests.
//!
//! Tests cover: activating owned items, per-type replacement, ownership
//! and type guards, deactivation, and collection listings.

use connect_core::catalog::RewardType;
use connect_core::config::EconomyConfig;
use connect_core::economy::TokenEconomy;
use connect_core::error::EconomyError;
use connect_core::ledger::TransactionKind;

fn economy_with_collector(user_id: &str) -> TokenEconomy {
    let mut economy =
        TokenEconomy::in_memory(EconomyConfig::default_test()).expect("build in-memory economy");
    economy.register_user(user_id, "Maya Quinn").expect("register user");
    economy
        .append_transaction(user_id, 500, TransactionKind::Earned, "Session payouts")
        .expect("seed balance");
    economy
}

#[test]
fn activating_a_new_border_replaces_the_shown_one() {
    let mut economy = economy_with_collector("user-maya");
    economy.purchase("user-maya", "border-gold").unwrap();
    economy.purchase("user-maya", "border-sapphire").unwrap();

    economy
        .activate_reward("user-maya", "border-gold", RewardType::ProfileBorder)
        .unwrap();
    let shown = economy
        .active_reward("user-maya", RewardType::ProfileBorder)
        .unwrap()
        .unwrap();
    assert_eq!(shown.item_id, "border-gold");

    economy
        .activate_reward("user-maya", "border-sapphire", RewardType::ProfileBorder)
        .unwrap();
    let shown = economy
        .active_reward("user-maya", RewardType::ProfileBorder)
        .unwrap()
        .unwrap();
    assert_eq!(shown.item_id, "border-sapphire", "newest activation wins the slot");

    let owned: Vec<_> = economy
        .owned_rewards("user-maya")
        .unwrap()
        .into_iter()
        .map(|o| o.item.item_id)
        .collect();
    assert!(
        owned.contains(&"border-gold".to_string()),
        "the replaced border stays owned"
    );
    assert!(owned.contains(&"border-sapphire".to_string()));
}

#[test]
fn different_types_are_active_at_the_same_time() {
    let mut economy = economy_with_collector("user-maya");
    economy.purchase("user-maya", "border-gold").unwrap();
    economy.purchase("user-maya", "theme-midnight").unwrap();

    economy
        .activate_reward("user-maya", "border-gold", RewardType::ProfileBorder)
        .unwrap();
    economy
        .activate_reward("user-maya", "theme-midnight", RewardType::CardTheme)
        .unwrap();

    let selections = economy.active_selections("user-maya").unwrap();
    assert_eq!(selections.len(), 2, "one slot per type, both filled");
}

#[test]
fn activating_an_unowned_item_fails() {
    let mut economy = economy_with_collector("user-maya");

    let err = economy
        .activate_reward("user-maya", "border-gold", RewardType::ProfileBorder)
        .unwrap_err();
    assert!(matches!(err, EconomyError::NotOwned { .. }), "got {err}");
    assert!(economy
        .active_reward("user-maya", RewardType::ProfileBorder)
        .unwrap()
        .is_none());
}

#[test]
fn activating_under_the_wrong_type_fails() {
    let mut economy = economy_with_collector("user-maya");
    economy.purchase("user-maya", "border-gold").unwrap();

    let err = economy
        .activate_reward("user-maya", "border-gold", RewardType::CardTheme)
        .unwrap_err();
    match err {
        EconomyError::TypeMismatch { expected, actual, .. } => {
            assert_eq!(expected, RewardType::CardTheme);
            assert_eq!(actual, RewardType::ProfileBorder);
        }
        other => panic!("expected TypeMismatch, got {other}"),
    }
    assert!(economy
        .active_reward("user-maya", RewardType::CardTheme)
        .unwrap()
        .is_none());
}

#[test]
fn deactivation_clears_the_slot_and_is_idempotent() {
    let mut economy = economy_with_collector("user-maya");
    economy.purchase("user-maya", "title-peer-mentor").unwrap();
    economy
        .activate_reward("user-maya", "title-peer-mentor", RewardType::Title)
        .unwrap();

    economy.deactivate_reward("user-maya", RewardType::Title).unwrap();
    assert!(economy
        .active_reward("user-maya", RewardType::Title)
        .unwrap()
        .is_none());

    // clearing an already-empty slot is fine
    economy.deactivate_reward("user-maya", RewardType::Title).unwrap();
}

/// Retiring an item from the storefront neither strips it from profiles
/// nor blocks re-activation of an owned copy.
#[test]
fn retired_items_stay_owned_and_active() {
    let mut economy = economy_with_collector("user-maya");
    economy.purchase("user-maya", "border-gold").unwrap();
    economy
        .activate_reward("user-maya", "border-gold", RewardType::ProfileBorder)
        .unwrap();

    economy.store.set_reward_active("border-gold", false).unwrap();

    let shown = economy
        .active_reward("user-maya", RewardType::ProfileBorder)
        .unwrap();
    assert!(shown.is_some(), "retired items stay on profiles");

    assert_eq!(economy.owned_rewards("user-maya").unwrap().len(), 1);
    economy
        .activate_reward("user-maya", "border-gold", RewardType::ProfileBorder)
        .unwrap();
}
