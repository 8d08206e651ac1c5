//! Error types for the bot core.

use thiserror::Error;

/// Top-level error for a turn (state storage, outbound transport, QnA service, wire model).
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Bot error: {0}")]
    Bot(String),

    #[error("QnA Maker error: {0}")]
    QnAMaker(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;
