//! Reward catalog rows.

use super::{read_json, EconomyStore};
use crate::catalog::{RewardItem, RewardType};
use crate::config::RewardItemDef;
use crate::error::{EconomyError, EconomyResult};
use rusqlite::{params, OptionalExtension, TransactionBehavior};

impl EconomyStore {
    /// Upsert the authored catalog into reward_item, as one transaction.
    /// Existing rows keep their item_id (ownership rows reference it) and
    /// take the authored fields. Returns how many definitions were applied.
    pub fn sync_catalog(&mut self, defs: &[RewardItemDef]) -> EconomyResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        for def in defs {
            if def.price <= 0 {
                return Err(EconomyError::InvalidAmount { amount: def.price });
            }
            tx.execute(
                "INSERT INTO reward_item
                    (item_id, name, description, reward_type, price, config, is_active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(item_id) DO UPDATE SET
                    name = excluded.name,
                    description = excluded.description,
                    reward_type = excluded.reward_type,
                    price = excluded.price,
                    config = excluded.config,
                    is_active = excluded.is_active",
                params![
                    def.item_id,
                    def.name,
                    def.description,
                    def.reward_type.as_str(),
                    def.price,
                    def.config.to_string(),
                    if def.is_active { 1 } else { 0 },
                ],
            )?;
        }
        tx.commit()?;
        Ok(defs.len())
    }

    /// Fetch one item, active or not. Callers decide whether an inactive
    /// item counts as missing.
    pub fn reward_item(&self, item_id: &str) -> EconomyResult<Option<RewardItem>> {
        let item = self
            .conn
            .query_row(
                "SELECT item_id, name, description, reward_type, price, config, is_active
                 FROM reward_item WHERE item_id = ?1",
                params![item_id],
                reward_item_row,
            )
            .optional()?;
        Ok(item)
    }

    /// Purchasable items, cheapest first.
    pub fn active_reward_items(&self) -> EconomyResult<Vec<RewardItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT item_id, name, description, reward_type, price, config, is_active
             FROM reward_item WHERE is_active = 1
             ORDER BY price ASC, item_id ASC",
        )?;
        let items = stmt
            .query_map([], reward_item_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Soft-delete or restore a catalog item. Ownership rows are untouched;
    /// users keep what they bought.
    pub fn set_reward_active(&mut self, item_id: &str, active: bool) -> EconomyResult<()> {
        let changed = self.conn.execute(
            "UPDATE reward_item SET is_active = ?1 WHERE item_id = ?2",
            params![if active { 1 } else { 0 }, item_id],
        )?;
        if changed == 0 {
            return Err(EconomyError::ItemNotFound {
                item_id: item_id.to_string(),
            });
        }
        Ok(())
    }
}

pub(super) fn reward_item_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RewardItem> {
    let raw_type: String = row.get(3)?;
    let reward_type = RewardType::parse(&raw_type)
        .ok_or_else(|| super::conversion_failure(3, format!("unknown reward type '{raw_type}'")))?;
    Ok(RewardItem {
        item_id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        reward_type,
        price: row.get(4)?,
        config: read_json(row, 5)?,
        is_active: row.get::<_, i64>(6)? != 0,
    })
}
