//! Participant rows for the ranker. Ordering happens in Rust, not SQL,
//! so the tie-break chain lives in exactly one place.

use super::{timestamp, EconomyStore, ParticipantRow};
use crate::error::EconomyResult;
use chrono::{DateTime, Utc};
use rusqlite::params;

impl EconomyStore {
    /// Users with at least one completed service, unranked and unordered.
    pub fn leaderboard_participants(&self) -> EconomyResult<Vec<ParticipantRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, display_name, average_rating, completed_services, token_balance
             FROM user_account WHERE completed_services > 0",
        )?;
        let rows = stmt
            .query_map([], participant_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Users with at least one completed service who also have an `earned`
    /// ledger entry inside the window `[start, end)`.
    pub fn participants_with_earnings(
        &self,
        start: &DateTime<Utc>,
        end: &DateTime<Utc>,
    ) -> EconomyResult<Vec<ParticipantRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.user_id, u.display_name, u.average_rating, u.completed_services,
                    u.token_balance
             FROM user_account u
             WHERE u.completed_services > 0
               AND EXISTS (
                   SELECT 1 FROM token_transaction t
                   WHERE t.user_id = u.user_id
                     AND t.kind = 'earned'
                     AND t.created_at >= ?1 AND t.created_at < ?2
               )",
        )?;
        let rows = stmt
            .query_map(params![timestamp(start), timestamp(end)], participant_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn participant_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ParticipantRow> {
    Ok(ParticipantRow {
        user_id: row.get(0)?,
        display_name: row.get(1)?,
        average_rating: row.get(2)?,
        completed_services: row.get(3)?,
        token_balance: row.get(4)?,
    })
}
