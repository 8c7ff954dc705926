use crate::catalog::RewardType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EconomyError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("User '{user_id}' not found")]
    UserNotFound { user_id: String },

    #[error("Reward item '{item_id}' not found or no longer available")]
    ItemNotFound { item_id: String },

    #[error("User '{user_id}' already owns item '{item_id}'")]
    AlreadyOwned { user_id: String, item_id: String },

    #[error("Insufficient balance: have {balance}, need {required}")]
    InsufficientBalance { balance: i64, required: i64 },

    #[error("Balance overflow for user '{user_id}': credit exceeds the representable maximum")]
    BalanceOverflow { user_id: String },

    #[error("User '{user_id}' does not own item '{item_id}'")]
    NotOwned { user_id: String, item_id: String },

    #[error("Item '{item_id}' is a {actual}, not a {expected}")]
    TypeMismatch {
        item_id: String,
        expected: RewardType,
        actual: RewardType,
    },

    #[error("Invalid token amount: {amount} (must be positive)")]
    InvalidAmount { amount: i64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EconomyResult<T> = Result<T, EconomyError>;
