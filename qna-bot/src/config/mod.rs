//! Bot configuration: BaseConfig (port + log + app credentials) + QnAConfig (knowledge base).

mod base;
mod bot_config;
mod qna;

#[cfg(test)]
mod tests;

pub use base::{BaseConfig, DEFAULT_PORT};
pub use bot_config::BotConfig;
pub use qna::QnAConfig;
