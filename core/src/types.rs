//! Shared primitive types used across the entire economy core.

/// A stable, unique identifier for a platform user.
pub type UserId = String;

/// A stable, unique identifier for a catalog reward item.
pub type ItemId = String;

/// A signed count of Connect Tokens. Positive ledger amounts credit a
/// balance, negative amounts debit it. Balances themselves never drop
/// below zero.
pub type TokenAmount = i64;
