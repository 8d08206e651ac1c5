//! Storage error types.
//!
//! Used by [`Storage`](crate::Storage) implementations and by [`BotState`](crate::BotState).

use bot_core::BotError;
use thiserror::Error;

/// Errors that can occur when reading, writing or deleting state.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("eTag conflict for key {key}: stored {stored}, supplied {supplied}")]
    ETagConflict {
        key: String,
        stored: String,
        supplied: String,
    },
    #[error("Item for key {0} is not a JSON object")]
    NotAnObject(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Missing activity field: {0}")]
    MissingKeyPart(&'static str),
}

impl From<StorageError> for BotError {
    fn from(e: StorageError) -> Self {
        BotError::Storage(e.to_string())
    }
}
