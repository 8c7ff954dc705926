//! The append-only token ledger.
//!
//! Ledger rows are never updated or deleted. The cached balance on
//! user_account moves in the same transaction as the row that explains
//! the change, so the two can never drift apart.

use crate::economy::TokenEconomy;
use crate::error::EconomyResult;
use crate::types::{TokenAmount, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a ledger entry exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Credit for a completed help session.
    Earned,
    /// Debit for a reward purchase.
    Spent,
    /// Credit from a promotion or leaderboard payout.
    Bonus,
    /// Manual correction by an administrator.
    AdminAdjust,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Earned => "earned",
            TransactionKind::Spent => "spent",
            TransactionKind::Bonus => "bonus",
            TransactionKind::AdminAdjust => "admin_adjust",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "earned" => Some(TransactionKind::Earned),
            "spent" => Some(TransactionKind::Spent),
            "bonus" => Some(TransactionKind::Bonus),
            "admin_adjust" => Some(TransactionKind::AdminAdjust),
            _ => None,
        }
    }
}

/// One immutable ledger row.
#[derive(Debug, Clone, Serialize)]
pub struct TokenTransaction {
    pub txn_id: String,
    pub user_id: UserId,
    /// Positive credits the balance, negative debits it.
    pub amount: TokenAmount,
    pub kind: TransactionKind,
    pub description: String,
    /// Admin who performed the change. None for organic entries.
    pub actor_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// A committed ledger append and the balance it produced.
#[derive(Debug, Clone)]
pub struct LedgerUpdate {
    pub transaction: TokenTransaction,
    pub new_balance: TokenAmount,
}

impl TokenEconomy {
    /// Current balance, straight from the account row.
    pub fn balance(&self, user_id: &str) -> EconomyResult<TokenAmount> {
        self.store.balance(user_id)
    }

    /// Append one ledger entry on the user's own behalf. A debit the
    /// balance cannot cover is rejected with nothing written.
    pub fn append_transaction(
        &mut self,
        user_id: &str,
        amount: TokenAmount,
        kind: TransactionKind,
        description: &str,
    ) -> EconomyResult<LedgerUpdate> {
        let update = self
            .store
            .append_transaction(user_id, amount, kind, description, None)?;
        log::debug!(
            "ledger: {user_id} {} {} -> balance {}",
            if amount >= 0 { "credited" } else { "debited" },
            amount.abs(),
            update.new_balance
        );
        Ok(update)
    }

    /// Credit tokens for a completed help session. The amount comes from
    /// the earning policy and the session rating.
    pub fn record_service_completion(
        &mut self,
        user_id: &str,
        rating: f64,
        description: &str,
    ) -> EconomyResult<LedgerUpdate> {
        let amount = self.config.earning.amount_for_rating(rating);
        let update = self
            .store
            .append_transaction(user_id, amount, TransactionKind::Earned, description, None)?;
        log::info!(
            "ledger: {user_id} earned {amount} tokens (rating {rating:.1}), balance {}",
            update.new_balance
        );
        Ok(update)
    }

    /// Transaction history, newest first.
    pub fn transactions_for_user(
        &self,
        user_id: &str,
        limit: usize,
    ) -> EconomyResult<Vec<TokenTransaction>> {
        self.store.transactions_for_user(user_id, limit)
    }
}
