//! Error types for the pick ledger

use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur in the pick ledger
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The player already carries a pick this season; nothing was written
    #[error("player {player_id} is already locked for season {season}")]
    DuplicatePick { season: i32, player_id: String },

    #[error("no pick recorded for player {player_id} in season {season}")]
    PickNotFound { season: i32, player_id: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
