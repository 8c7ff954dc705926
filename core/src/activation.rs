//! Per-type activation of owned rewards.
//!
//! Ownership is permanent; activation is a preference. Activating a new
//! profile border replaces the shown border, it never removes the old
//! one from the user's collection.

use crate::catalog::{RewardItem, RewardType};
use crate::economy::TokenEconomy;
use crate::error::{EconomyError, EconomyResult};
use crate::types::{ItemId, UserId};
use chrono::{DateTime, Utc};

/// The single item a user currently shows for one reward type.
#[derive(Debug, Clone)]
pub struct ActiveSelection {
    pub user_id: UserId,
    pub reward_type: RewardType,
    pub item_id: ItemId,
    pub activated_at: DateTime<Utc>,
}

/// An ownership row joined with its catalog item.
#[derive(Debug, Clone)]
pub struct OwnedReward {
    pub item: RewardItem,
    pub purchased_at: DateTime<Utc>,
}

impl TokenEconomy {
    /// Show `item_id` as the active cosmetic for `reward_type`. The item
    /// must be owned and must be of that type.
    pub fn activate_reward(
        &mut self,
        user_id: &str,
        item_id: &str,
        reward_type: RewardType,
    ) -> EconomyResult<ActiveSelection> {
        if !self.store.ownership_exists(user_id, item_id)? {
            return Err(EconomyError::NotOwned {
                user_id: user_id.to_string(),
                item_id: item_id.to_string(),
            });
        }
        let Some(item) = self.store.reward_item(item_id)? else {
            // ownership always references a catalog row; only an
            // out-of-band delete can get us here
            return Err(EconomyError::ItemNotFound {
                item_id: item_id.to_string(),
            });
        };
        if item.reward_type != reward_type {
            return Err(EconomyError::TypeMismatch {
                item_id: item_id.to_string(),
                expected: reward_type,
                actual: item.reward_type,
            });
        }

        let selection = self.store.set_active_reward(user_id, reward_type, item_id)?;
        log::info!("activation: {user_id} now shows {item_id} as {reward_type}");
        Ok(selection)
    }

    /// Stop showing anything for `reward_type`. Idempotent.
    pub fn deactivate_reward(
        &mut self,
        user_id: &str,
        reward_type: RewardType,
    ) -> EconomyResult<()> {
        self.store.clear_active_reward(user_id, reward_type)?;
        log::debug!("activation: {user_id} cleared {reward_type}");
        Ok(())
    }

    /// The item currently active for one reward type, if any.
    pub fn active_reward(
        &self,
        user_id: &str,
        reward_type: RewardType,
    ) -> EconomyResult<Option<RewardItem>> {
        self.store.active_reward_item(user_id, reward_type)
    }

    /// Everything the user owns, newest purchase first. Items retired
    /// from the catalog stay in the collection.
    pub fn owned_rewards(&self, user_id: &str) -> EconomyResult<Vec<OwnedReward>> {
        self.store.owned_rewards(user_id)
    }

    /// All currently active selections, at most one per reward type.
    pub fn active_selections(&self, user_id: &str) -> EconomyResult<Vec<ActiveSelection>> {
        self.store.active_selections(user_id)
    }
}
