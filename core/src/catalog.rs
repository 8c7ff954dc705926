//! The reward catalog: what Connect Tokens can buy.

use crate::config::RewardItemDef;
use crate::economy::TokenEconomy;
use crate::error::{EconomyError, EconomyResult};
use crate::types::{ItemId, TokenAmount};
use serde::{Deserialize, Serialize};

/// Cosmetic slot a reward occupies. A user shows at most one active item
/// per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardType {
    ProfileBorder,
    CardTheme,
    Badge,
    SpecialEffect,
    Title,
}

impl RewardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RewardType::ProfileBorder => "profile_border",
            RewardType::CardTheme => "card_theme",
            RewardType::Badge => "badge",
            RewardType::SpecialEffect => "special_effect",
            RewardType::Title => "title",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "profile_border" => Some(RewardType::ProfileBorder),
            "card_theme" => Some(RewardType::CardTheme),
            "badge" => Some(RewardType::Badge),
            "special_effect" => Some(RewardType::SpecialEffect),
            "title" => Some(RewardType::Title),
            _ => None,
        }
    }
}

impl std::fmt::Display for RewardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One purchasable catalog row.
#[derive(Debug, Clone, Serialize)]
pub struct RewardItem {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub reward_type: RewardType,
    pub price: TokenAmount,
    /// Cosmetic payload handed to clients verbatim (colors, animation
    /// names, title text). The core never interprets it.
    pub config: serde_json::Value,
    pub is_active: bool,
}

impl TokenEconomy {
    /// One purchasable item. Items that never existed and items
    /// soft-deleted from the catalog are both reported as not found.
    pub fn reward_item(&self, item_id: &str) -> EconomyResult<RewardItem> {
        match self.store.reward_item(item_id)? {
            Some(item) if item.is_active => Ok(item),
            _ => Err(EconomyError::ItemNotFound {
                item_id: item_id.to_string(),
            }),
        }
    }

    /// The storefront view: active items, cheapest first.
    pub fn active_reward_items(&self) -> EconomyResult<Vec<RewardItem>> {
        self.store.active_reward_items()
    }

    /// Re-apply the authored catalog, typically after editing the JSON.
    pub fn sync_catalog(&mut self, defs: &[RewardItemDef]) -> EconomyResult<usize> {
        let n = self.store.sync_catalog(defs)?;
        log::info!("catalog: synced {n} reward items");
        Ok(n)
    }
}
