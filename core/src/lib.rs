//! Campus Connect token economy core.
//!
//! Connect Tokens are the currency of the campus skill exchange: users
//! earn them by completing help sessions and spend them on cosmetic
//! rewards from the catalog. A deterministic weekly leaderboard ranks
//! the most active helpers.
//!
//! RULES:
//!   - Only the store talks to the database.
//!   - token_balance moves only through ledger appends; every change is
//!     explained by exactly one token_transaction row.
//!   - Balances never go below zero; overdraft attempts fail with nothing
//!     written.

pub mod activation;
pub mod admin;
pub mod catalog;
pub mod config;
pub mod economy;
pub mod error;
pub mod leaderboard;
pub mod ledger;
pub mod redemption;
pub mod store;
pub mod types;
