//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Components call store methods — they never execute SQL directly.
//! token_balance is written exclusively by the ledger methods in
//! store/ledger.rs, always in the same transaction as the
//! token_transaction row that explains the change.

use crate::error::{EconomyError, EconomyResult};
use crate::types::{TokenAmount, UserId};
use chrono::{DateTime, SecondsFormat, Utc};
mod catalog;
mod leaderboard;
mod ledger;
mod ownership;
use rusqlite::{params, Connection, OptionalExtension};

pub use ledger::PurchaseFailpoint;

const MIGRATIONS: &[&str] = &[
    include_str!("../../../migrations/001_accounts_ledger.sql"),
    include_str!("../../../migrations/002_rewards.sql"),
    include_str!("../../../migrations/003_transaction_actor.sql"),
];

pub struct EconomyStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl EconomyStore {
    pub fn open(path: &str) -> EconomyResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        // Writers queue behind each other instead of failing with SQLITE_BUSY.
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> EconomyResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases, this returns a new in-memory database (isolated).
    /// For file-based databases, this opens the same file.
    pub fn reopen(&self) -> EconomyResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply schema migrations that have not run yet. Progress is tracked
    /// in PRAGMA user_version because 003 is an ALTER TABLE and must not
    /// run twice against the same file. Each batch commits together with
    /// its version bump, so an interrupted run resumes at the right file.
    pub fn migrate(&mut self) -> EconomyResult<()> {
        Self::run_migrations(&mut self.conn, MIGRATIONS)
    }

    fn run_migrations(conn: &mut Connection, migrations: &[&str]) -> EconomyResult<()> {
        let applied: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        for (idx, sql) in migrations.iter().enumerate().skip(applied as usize) {
            let tx = conn.transaction()?;
            tx.execute_batch(sql)?;
            tx.pragma_update(None, "user_version", (idx + 1) as i64)?;
            tx.commit()?;
        }
        Ok(())
    }

    // ── User accounts ──────────────────────────────────────────

    /// Create a user, or refresh the display name if the id already exists.
    /// New users start with a zero balance and no service history.
    pub fn upsert_user(&mut self, user_id: &str, display_name: &str) -> EconomyResult<()> {
        self.conn.execute(
            "INSERT INTO user_account
                (user_id, display_name, token_balance, average_rating, completed_services, created_at)
             VALUES (?1, ?2, 0, 0, 0, ?3)
             ON CONFLICT(user_id) DO UPDATE SET display_name = excluded.display_name",
            params![user_id, display_name, timestamp(&Utc::now())],
        )?;
        Ok(())
    }

    pub fn get_user(&self, user_id: &str) -> EconomyResult<UserAccount> {
        let account = self
            .conn
            .query_row(
                "SELECT user_id, display_name, token_balance, average_rating,
                        completed_services, created_at
                 FROM user_account WHERE user_id = ?1",
                params![user_id],
                user_account_row,
            )
            .optional()?;
        account.ok_or_else(|| EconomyError::UserNotFound {
            user_id: user_id.to_string(),
        })
    }

    /// Update the rating/service rollups maintained by the booking side of
    /// the platform. The leaderboard ranks on these values.
    pub fn set_user_aggregates(
        &mut self,
        user_id: &str,
        average_rating: f64,
        completed_services: i64,
    ) -> EconomyResult<()> {
        let changed = self.conn.execute(
            "UPDATE user_account SET average_rating = ?1, completed_services = ?2
             WHERE user_id = ?3",
            params![average_rating, completed_services, user_id],
        )?;
        if changed == 0 {
            return Err(EconomyError::UserNotFound {
                user_id: user_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn user_count(&self) -> EconomyResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM user_account", [], |row| row.get(0))?;
        Ok(n)
    }

    // ── Test support ───────────────────────────────────────────

    pub fn schema_version(&self) -> EconomyResult<i64> {
        let v = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(v)
    }

    /// Run an arbitrary migration list with the same rules as `migrate`:
    /// skip what user_version records as applied, commit each batch in
    /// one transaction with its version bump.
    pub fn apply_migrations(&mut self, migrations: &[&str]) -> EconomyResult<()> {
        Self::run_migrations(&mut self.conn, migrations)
    }
}

/// One row of user_account.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub user_id: UserId,
    pub display_name: String,
    pub token_balance: TokenAmount,
    pub average_rating: f64,
    pub completed_services: i64,
    pub created_at: DateTime<Utc>,
}

/// The slice of user_account the leaderboard ranks on.
#[derive(Debug, Clone)]
pub struct ParticipantRow {
    pub user_id: UserId,
    pub display_name: String,
    pub average_rating: f64,
    pub completed_services: i64,
    pub token_balance: TokenAmount,
}

fn user_account_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserAccount> {
    Ok(UserAccount {
        user_id: row.get(0)?,
        display_name: row.get(1)?,
        token_balance: row.get(2)?,
        average_rating: row.get(3)?,
        completed_services: row.get(4)?,
        created_at: read_timestamp(row, 5)?,
    })
}

// ── Shared row helpers ─────────────────────────────────────────────

/// Timestamps are stored as RFC 3339 TEXT with fixed millisecond width,
/// so lexicographic order in SQL equals chronological order.
fn timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn read_timestamp(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| conversion_failure(idx, format!("bad timestamp '{raw}': {e}")))
}

fn read_json(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<serde_json::Value> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_failure(idx, format!("bad config json: {e}")))
}

fn conversion_failure(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, message.into())
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4())
}
