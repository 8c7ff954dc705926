//! The façade every caller goes through.
//!
//! `TokenEconomy` owns the store and the policy config. Each component
//! hangs its operations off this type from its own module: ledger.rs,
//! catalog.rs, redemption.rs, activation.rs, leaderboard.rs, admin.rs.

use crate::config::EconomyConfig;
use crate::error::EconomyResult;
use crate::store::{EconomyStore, UserAccount};

pub struct TokenEconomy {
    pub store: EconomyStore,
    pub config: EconomyConfig,
}

impl TokenEconomy {
    /// Open (or create) the economy database at `path`, bring the schema
    /// up to date, and sync the configured reward catalog into it.
    pub fn open(path: &str, config: EconomyConfig) -> EconomyResult<Self> {
        let mut store = EconomyStore::open(path)?;
        store.migrate()?;
        Self::build(store, config)
    }

    /// Fully in-memory economy (used in tests).
    pub fn in_memory(config: EconomyConfig) -> EconomyResult<Self> {
        let mut store = EconomyStore::in_memory()?;
        store.migrate()?;
        Self::build(store, config)
    }

    fn build(store: EconomyStore, config: EconomyConfig) -> EconomyResult<Self> {
        let mut economy = Self { store, config };
        if !economy.config.rewards.is_empty() {
            let defs = economy.config.rewards.clone();
            let n = economy.store.sync_catalog(&defs)?;
            log::info!("economy: opened with {n} catalog items");
        }
        Ok(economy)
    }

    // ── Users ──────────────────────────────────────────────────

    /// Create a user, or refresh their display name. New users start at
    /// zero balance with no service history.
    pub fn register_user(&mut self, user_id: &str, display_name: &str) -> EconomyResult<()> {
        self.store.upsert_user(user_id, display_name)?;
        log::debug!("economy: registered {user_id} ({display_name})");
        Ok(())
    }

    pub fn user(&self, user_id: &str) -> EconomyResult<UserAccount> {
        self.store.get_user(user_id)
    }

    /// Update the rating and completed-service rollups maintained by the
    /// booking side of the platform. The leaderboard ranks on these.
    pub fn set_user_aggregates(
        &mut self,
        user_id: &str,
        average_rating: f64,
        completed_services: i64,
    ) -> EconomyResult<()> {
        self.store
            .set_user_aggregates(user_id, average_rating, completed_services)
    }
}
