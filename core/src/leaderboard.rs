//! Deterministic weekly ranking.

use crate::config::ParticipationRule;
use crate::economy::TokenEconomy;
use crate::error::EconomyResult;
use crate::store::ParticipantRow;
use crate::types::{TokenAmount, UserId};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Half-open ranking window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl LeaderboardPeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The seven days ending at `end`.
    pub fn week_ending(end: DateTime<Utc>) -> Self {
        Self {
            start: end - Duration::days(7),
            end,
        }
    }
}

/// One ranked row. `rank` is 1-based and contiguous: ties in rating are
/// broken by service count, then user id, so no two entries share a rank.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: UserId,
    pub display_name: String,
    pub average_rating: f64,
    pub completed_services: i64,
    pub token_balance: TokenAmount,
}

/// A ranked slice plus where the caller landed.
#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
    /// The caller's own row when they participate but fall outside
    /// `entries`. None when they are inside it or not ranked at all.
    pub caller_entry: Option<LeaderboardEntry>,
    pub total_participants: usize,
}

impl TokenEconomy {
    /// Rank participants for the window: rating desc, then completed
    /// services desc, then user id asc. Two calls over the same data
    /// return byte-identical output.
    pub fn leaderboard(
        &self,
        period: &LeaderboardPeriod,
        limit: usize,
        caller: Option<&str>,
    ) -> EconomyResult<Leaderboard> {
        let mut rows = match self.config.leaderboard.participation {
            ParticipationRule::LifetimeServices => self.store.leaderboard_participants()?,
            ParticipationRule::EarnedInWindow => self
                .store
                .participants_with_earnings(&period.start, &period.end)?,
        };
        rows.sort_by(|a, b| {
            b.average_rating
                .total_cmp(&a.average_rating)
                .then_with(|| b.completed_services.cmp(&a.completed_services))
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        let total_participants = rows.len();
        let entries: Vec<LeaderboardEntry> = rows
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, row)| ranked(i + 1, row))
            .collect();

        let caller_entry = caller.and_then(|user_id| {
            if entries.iter().any(|e| e.user_id == user_id) {
                return None;
            }
            rows.iter()
                .position(|row| row.user_id == user_id)
                .map(|pos| ranked(pos + 1, &rows[pos]))
        });

        log::debug!(
            "leaderboard: ranked {total_participants} participants for week ending {}",
            period.end
        );
        Ok(Leaderboard {
            entries,
            caller_entry,
            total_participants,
        })
    }
}

fn ranked(rank: usize, row: &ParticipantRow) -> LeaderboardEntry {
    LeaderboardEntry {
        rank,
        user_id: row.user_id.clone(),
        display_name: row.display_name.clone(),
        average_rating: row.average_rating,
        completed_services: row.completed_services,
        token_balance: row.token_balance,
    }
}
