//! Multi-connection race tests against a shared on-disk database.
//!
//! Writes run inside IMMEDIATE transactions with a busy timeout, so two
//! racing connections serialize: one side wins cleanly and the other
//! fails cleanly against the committed state.

use std::sync::{Arc, Barrier};
use std::thread;

use connect_core::config::EconomyConfig;
use connect_core::economy::TokenEconomy;
use connect_core::error::EconomyError;
use connect_core::ledger::TransactionKind;

fn temp_db(tag: &str) -> String {
    std::env::temp_dir()
        .join(format!("connect-economy-{tag}-{}.db", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned()
}

fn cleanup(path: &str) {
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path}{suffix}"));
    }
}

fn seeded_economy(path: &str, user_id: &str, balance: i64) -> TokenEconomy {
    let mut economy =
        TokenEconomy::open(path, EconomyConfig::default_test()).expect("open economy");
    economy.register_user(user_id, "Remy Fontaine").expect("register user");
    economy
        .append_transaction(user_id, balance, TransactionKind::Earned, "Stats tutoring")
        .expect("seed balance");
    economy
}

#[test]
fn racing_purchases_award_item_exactly_once() {
    let path = temp_db("purchase-race");
    // border-gold costs exactly the seeded balance, so a double charge
    // would also be a double spend of every token the user has
    let economy = seeded_economy(&path, "user-remy", 100);
    drop(economy);

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut economy =
                    TokenEconomy::open(&path, EconomyConfig::default_test()).expect("open economy");
                barrier.wait();
                economy.purchase("user-remy", "border-gold")
            })
        })
        .collect();
    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect();

    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "exactly one purchase may win");
    let err = results.into_iter().find_map(Result::err).expect("one side lost");
    assert!(matches!(err, EconomyError::AlreadyOwned { .. }), "got {err}");

    let economy = TokenEconomy::open(&path, EconomyConfig::default_test()).unwrap();
    assert_eq!(economy.balance("user-remy").unwrap(), 0, "charged once, not twice");
    assert_eq!(economy.store.ownership_count("user-remy", "border-gold").unwrap(), 1);
    assert_eq!(
        economy.store.transaction_count("user-remy").unwrap(),
        2,
        "the seed credit and one debit"
    );
    cleanup(&path);
}

#[test]
fn racing_debits_never_overdraw() {
    let path = temp_db("debit-race");
    let economy = seeded_economy(&path, "user-remy", 150);
    drop(economy);

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut economy =
                    TokenEconomy::open(&path, EconomyConfig::default_test()).expect("open economy");
                barrier.wait();
                economy.append_transaction("user-remy", -100, TransactionKind::Spent, "Flash sale")
            })
        })
        .collect();
    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .collect();

    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "150 tokens cover one debit of 100, not two");
    let err = results.into_iter().find_map(Result::err).expect("one side lost");
    assert!(
        matches!(err, EconomyError::InsufficientBalance { balance: 50, required: 100 }),
        "the loser saw the post-commit balance, got {err}"
    );

    let economy = TokenEconomy::open(&path, EconomyConfig::default_test()).unwrap();
    assert_eq!(economy.balance("user-remy").unwrap(), 50);
    assert_eq!(economy.store.transaction_count("user-remy").unwrap(), 2);
    cleanup(&path);
}

#[test]
fn ownership_is_visible_across_connections() {
    let path = temp_db("shared-view");
    let mut economy_a = seeded_economy(&path, "user-sol", 100);
    economy_a.purchase("user-sol", "badge-founding-tutor").unwrap();

    // a raw second connection to the same file sees the committed purchase
    let store_b = economy_a.store.reopen().unwrap();
    assert_eq!(store_b.balance("user-sol").unwrap(), 60);
    assert!(store_b.ownership_exists("user-sol", "badge-founding-tutor").unwrap());
    drop(store_b);

    let mut economy_b = TokenEconomy::open(&path, EconomyConfig::default_test()).unwrap();
    let err = economy_b.purchase("user-sol", "badge-founding-tutor").unwrap_err();
    assert!(matches!(err, EconomyError::AlreadyOwned { .. }), "got {err}");
    assert_eq!(economy_b.owned_rewards("user-sol").unwrap().len(), 1);

    drop(economy_a);
    drop(economy_b);
    cleanup(&path);
}
