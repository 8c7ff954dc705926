//! Reward purchase. The exchange of tokens for a catalog item happens
//! completely or leaves no trace.

use crate::catalog::RewardItem;
use crate::economy::TokenEconomy;
use crate::error::EconomyResult;
use crate::ledger::TokenTransaction;
use crate::types::TokenAmount;

/// Everything a successful purchase produced.
#[derive(Debug, Clone)]
pub struct PurchaseReceipt {
    pub item: RewardItem,
    pub transaction: TokenTransaction,
    pub new_balance: TokenAmount,
}

impl TokenEconomy {
    /// Buy `item_id` for `user_id` at the catalog price. Fails without
    /// side effects when the item is unavailable, already owned, or the
    /// balance cannot cover the price.
    pub fn purchase(&mut self, user_id: &str, item_id: &str) -> EconomyResult<PurchaseReceipt> {
        match self.store.purchase_reward(user_id, item_id) {
            Ok(receipt) => {
                log::info!(
                    "purchase: {user_id} bought {} for {} tokens, {} left",
                    receipt.item.item_id,
                    receipt.item.price,
                    receipt.new_balance
                );
                Ok(receipt)
            }
            Err(e) => {
                log::warn!("purchase: rejected for {user_id} on {item_id}: {e}");
                Err(e)
            }
        }
    }
}
