//! Audited administrative adjustments and weekly bonus payouts.
//!
//! Admin changes ride the same ledger path as organic earn/spend, with
//! the acting admin recorded on the row. There is no way to set a
//! balance directly.

use crate::economy::TokenEconomy;
use crate::error::{EconomyError, EconomyResult};
use crate::leaderboard::LeaderboardPeriod;
use crate::ledger::{LedgerUpdate, TransactionKind};
use crate::types::{TokenAmount, UserId};
use serde::Serialize;

/// One leaderboard bonus payment.
#[derive(Debug, Clone, Serialize)]
pub struct BonusAward {
    pub user_id: UserId,
    pub rank: usize,
    pub amount: TokenAmount,
    pub new_balance: TokenAmount,
}

impl TokenEconomy {
    /// Credit tokens on an admin's authority. `amount` must be positive;
    /// the ledger entry records the admin as actor.
    pub fn award_tokens(
        &mut self,
        admin_id: &str,
        user_id: &str,
        amount: TokenAmount,
        reason: Option<&str>,
    ) -> EconomyResult<LedgerUpdate> {
        if amount <= 0 {
            return Err(EconomyError::InvalidAmount { amount });
        }
        let description = reason
            .map(str::to_string)
            .unwrap_or_else(|| self.config.default_award_description.clone());
        let update = self.store.append_transaction(
            user_id,
            amount,
            TransactionKind::Bonus,
            &description,
            Some(admin_id),
        )?;
        log::info!(
            "admin: {admin_id} awarded {amount} tokens to {user_id}, balance {}",
            update.new_balance
        );
        Ok(update)
    }

    /// Remove tokens on an admin's authority. `amount` must be positive;
    /// rejected when it would take the balance below zero.
    pub fn deduct_tokens(
        &mut self,
        admin_id: &str,
        user_id: &str,
        amount: TokenAmount,
        reason: Option<&str>,
    ) -> EconomyResult<LedgerUpdate> {
        if amount <= 0 {
            return Err(EconomyError::InvalidAmount { amount });
        }
        let description = reason
            .map(str::to_string)
            .unwrap_or_else(|| self.config.default_deduction_description.clone());
        let update = self.store.append_transaction(
            user_id,
            -amount,
            TransactionKind::AdminAdjust,
            &description,
            Some(admin_id),
        )?;
        log::warn!(
            "admin: {admin_id} deducted {amount} tokens from {user_id}, balance {}",
            update.new_balance
        );
        Ok(update)
    }

    /// Pay the configured weekly bonuses to the top of the leaderboard,
    /// one ledger entry per rank in the schedule. An empty schedule pays
    /// nobody.
    pub fn award_leaderboard_bonuses(
        &mut self,
        admin_id: &str,
        period: &LeaderboardPeriod,
    ) -> EconomyResult<Vec<BonusAward>> {
        let schedule = self.config.leaderboard.bonus_schedule.clone();
        if schedule.is_empty() {
            return Ok(Vec::new());
        }
        let board = self.leaderboard(period, schedule.len(), None)?;

        let mut awards = Vec::with_capacity(board.entries.len());
        for entry in &board.entries {
            let amount = schedule[entry.rank - 1];
            if amount <= 0 {
                continue;
            }
            let description = format!("Weekly leaderboard bonus: rank {}", entry.rank);
            let update = self.store.append_transaction(
                &entry.user_id,
                amount,
                TransactionKind::Bonus,
                &description,
                Some(admin_id),
            )?;
            awards.push(BonusAward {
                user_id: entry.user_id.clone(),
                rank: entry.rank,
                amount,
                new_balance: update.new_balance,
            });
        }
        log::info!(
            "admin: {} leaderboard bonuses paid out by {admin_id}",
            awards.len()
        );
        Ok(awards)
    }
}
