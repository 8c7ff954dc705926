//! Reward ownership and active cosmetic selections.

use super::catalog::reward_item_row;
use super::{read_timestamp, timestamp, EconomyStore};
use crate::activation::{ActiveSelection, OwnedReward};
use crate::catalog::{RewardItem, RewardType};
use crate::error::EconomyResult;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

impl EconomyStore {
    pub fn ownership_exists(&self, user_id: &str, item_id: &str) -> EconomyResult<bool> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM reward_ownership WHERE user_id = ?1 AND item_id = ?2",
            params![user_id, item_id],
            |row| row.get(0),
        )?;
        Ok(n > 0)
    }

    /// Everything the user has purchased, newest purchase first. Includes
    /// items since retired from the catalog.
    pub fn owned_rewards(&self, user_id: &str) -> EconomyResult<Vec<OwnedReward>> {
        let mut stmt = self.conn.prepare(
            "SELECT i.item_id, i.name, i.description, i.reward_type, i.price, i.config,
                    i.is_active, o.created_at
             FROM reward_ownership o
             JOIN reward_item i ON i.item_id = o.item_id
             WHERE o.user_id = ?1
             ORDER BY o.created_at DESC, o.rowid DESC",
        )?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(OwnedReward {
                    item: reward_item_row(row)?,
                    purchased_at: read_timestamp(row, 7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Make `item_id` the active selection for `reward_type`, replacing
    /// any previous selection of that type.
    pub fn set_active_reward(
        &mut self,
        user_id: &str,
        reward_type: RewardType,
        item_id: &str,
    ) -> EconomyResult<ActiveSelection> {
        let selection = ActiveSelection {
            user_id: user_id.to_string(),
            reward_type,
            item_id: item_id.to_string(),
            activated_at: Utc::now(),
        };
        self.conn.execute(
            "INSERT OR REPLACE INTO active_reward (user_id, reward_type, item_id, activated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                selection.user_id,
                selection.reward_type.as_str(),
                selection.item_id,
                timestamp(&selection.activated_at),
            ],
        )?;
        Ok(selection)
    }

    /// Clear the active selection for one reward type. No-op when nothing
    /// was active.
    pub fn clear_active_reward(
        &mut self,
        user_id: &str,
        reward_type: RewardType,
    ) -> EconomyResult<()> {
        self.conn.execute(
            "DELETE FROM active_reward WHERE user_id = ?1 AND reward_type = ?2",
            params![user_id, reward_type.as_str()],
        )?;
        Ok(())
    }

    /// The item currently shown for one reward type, if any.
    pub fn active_reward_item(
        &self,
        user_id: &str,
        reward_type: RewardType,
    ) -> EconomyResult<Option<RewardItem>> {
        let item = self
            .conn
            .query_row(
                "SELECT i.item_id, i.name, i.description, i.reward_type, i.price, i.config,
                        i.is_active
                 FROM active_reward a
                 JOIN reward_item i ON i.item_id = a.item_id
                 WHERE a.user_id = ?1 AND a.reward_type = ?2",
                params![user_id, reward_type.as_str()],
                reward_item_row,
            )
            .optional()?;
        Ok(item)
    }

    /// All active selections for a user, at most one per reward type.
    pub fn active_selections(&self, user_id: &str) -> EconomyResult<Vec<ActiveSelection>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, reward_type, item_id, activated_at
             FROM active_reward WHERE user_id = ?1
             ORDER BY reward_type ASC",
        )?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                let raw_type: String = row.get(1)?;
                let reward_type = RewardType::parse(&raw_type).ok_or_else(|| {
                    super::conversion_failure(1, format!("unknown reward type '{raw_type}'"))
                })?;
                Ok(ActiveSelection {
                    user_id: row.get(0)?,
                    reward_type,
                    item_id: row.get(2)?,
                    activated_at: read_timestamp(row, 3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Test support ───────────────────────────────────────────

    /// Ownership rows for (user, item). The UNIQUE constraint keeps this
    /// at zero or one.
    pub fn ownership_count(&self, user_id: &str, item_id: &str) -> EconomyResult<i64> {
        let n = self.conn.query_row(
            "SELECT COUNT(*) FROM reward_ownership WHERE user_id = ?1 AND item_id = ?2",
            params![user_id, item_id],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}
