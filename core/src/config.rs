use crate::types::TokenAmount;
use serde::{Deserialize, Serialize};

// ── Leaderboard ────────────────────────────────────────────────────

/// Which users count as leaderboard participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationRule {
    /// Anyone with at least one completed service, ever.
    LifetimeServices,
    /// Only users with an `earned` ledger entry inside the ranking window.
    EarnedInWindow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    pub participation: ParticipationRule,
    /// Number of entries returned when the caller does not ask for more.
    pub default_limit: usize,
    /// Weekly bonus paid per rank, index 0 = rank 1. Empty disables payouts.
    pub bonus_schedule: Vec<TokenAmount>,
}

// ── Earning policy ─────────────────────────────────────────────────

/// A rating threshold and the token amount paid at or above it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingBand {
    pub min_rating: f64,
    pub amount: TokenAmount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningConfig {
    /// Paid when no rating band matches (e.g. an unrated session).
    pub base_amount: TokenAmount,
    pub rating_bands: Vec<RatingBand>,
}

impl EarningConfig {
    /// Tokens earned for a completed service at the given session rating.
    /// Bands may appear in any order in the file; the highest matching
    /// amount wins.
    pub fn amount_for_rating(&self, rating: f64) -> TokenAmount {
        self.rating_bands
            .iter()
            .filter(|band| rating >= band.min_rating)
            .map(|band| band.amount)
            .max()
            .unwrap_or(self.base_amount)
    }
}

// ── Reward catalog ─────────────────────────────────────────────────

/// Catalog definition for one reward item, as authored in
/// reward_catalog.json. Synced into the reward_item table on open.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardItemDef {
    pub item_id: String,
    pub name: String,
    pub description: String,
    pub reward_type: crate::catalog::RewardType,
    pub price: TokenAmount,
    /// Cosmetic payload handed to clients verbatim (colors, animation
    /// names, title text). The core never interprets it.
    #[serde(default = "empty_config")]
    pub config: serde_json::Value,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn empty_config() -> serde_json::Value {
    serde_json::json!({})
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
struct RewardCatalogFile {
    rewards: Vec<RewardItemDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct EconomyFile {
    leaderboard: LeaderboardConfig,
    earning: EarningConfig,
    default_award_description: String,
    default_deduction_description: String,
}

// ── Top-level config ───────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct EconomyConfig {
    pub leaderboard: LeaderboardConfig,
    pub earning: EarningConfig,
    /// Ledger description used when an admin award gives no reason.
    pub default_award_description: String,
    /// Ledger description used when an admin deduction gives no reason.
    pub default_deduction_description: String,
    pub rewards: Vec<RewardItemDef>,
}

impl EconomyConfig {
    /// Load from the data/ directory.
    /// In tests, use EconomyConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/economy/economy_config.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: EconomyFile = serde_json::from_str(&content)?;

        let catalog_path = format!("{data_dir}/rewards/reward_catalog.json");
        let catalog_content = std::fs::read_to_string(&catalog_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {catalog_path}: {e}"))?;
        let catalog_file: RewardCatalogFile = serde_json::from_str(&catalog_content)?;

        Ok(Self {
            leaderboard: file.leaderboard,
            earning: file.earning,
            default_award_description: file.default_award_description,
            default_deduction_description: file.default_deduction_description,
            rewards: catalog_file.rewards,
        })
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        use crate::catalog::RewardType;

        let rewards = vec![
            RewardItemDef {
                item_id: "border-gold".into(),
                name: "Gold Profile Border".into(),
                description: "A gilded frame around your profile picture.".into(),
                reward_type: RewardType::ProfileBorder,
                price: 100,
                config: serde_json::json!({ "color": "#d4af37", "glow": true }),
                is_active: true,
            },
            RewardItemDef {
                item_id: "border-sapphire".into(),
                name: "Sapphire Profile Border".into(),
                description: "A deep blue frame.".into(),
                reward_type: RewardType::ProfileBorder,
                price: 80,
                config: serde_json::json!({ "color": "#0f52ba", "glow": false }),
                is_active: true,
            },
            RewardItemDef {
                item_id: "theme-midnight".into(),
                name: "Midnight Card Theme".into(),
                description: "Dark service cards with silver lettering.".into(),
                reward_type: RewardType::CardTheme,
                price: 75,
                config: serde_json::json!({ "background": "#101321" }),
                is_active: true,
            },
            RewardItemDef {
                item_id: "badge-founding-tutor".into(),
                name: "Founding Tutor Badge".into(),
                description: "Shown beside your name on every listing.".into(),
                reward_type: RewardType::Badge,
                price: 40,
                config: serde_json::json!({ "icon": "laurel" }),
                is_active: true,
            },
            RewardItemDef {
                item_id: "effect-confetti".into(),
                name: "Confetti Burst".into(),
                description: "Confetti when a booking is confirmed.".into(),
                reward_type: RewardType::SpecialEffect,
                price: 150,
                config: serde_json::json!({ "animation": "confetti", "duration_ms": 1800 }),
                is_active: true,
            },
            RewardItemDef {
                item_id: "title-peer-mentor".into(),
                name: "Peer Mentor".into(),
                description: "A title shown under your display name.".into(),
                reward_type: RewardType::Title,
                price: 60,
                config: serde_json::json!({ "text": "Peer Mentor" }),
                is_active: true,
            },
        ];

        Self {
            leaderboard: LeaderboardConfig {
                participation: ParticipationRule::LifetimeServices,
                default_limit: 10,
                bonus_schedule: vec![100, 50, 25],
            },
            earning: EarningConfig {
                base_amount: 10,
                rating_bands: vec![
                    RatingBand { min_rating: 4.8, amount: 50 },
                    RatingBand { min_rating: 4.5, amount: 35 },
                    RatingBand { min_rating: 4.0, amount: 25 },
                    RatingBand { min_rating: 3.0, amount: 15 },
                ],
            },
            default_award_description: "Token award from the Campus Connect team".into(),
            default_deduction_description: "Balance adjustment by the Campus Connect team".into(),
            rewards,
        }
    }
}
