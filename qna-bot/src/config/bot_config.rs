//! BotConfig: BaseConfig + QnAConfig. Use load() for env-based loading.

use anyhow::Result;

use super::{BaseConfig, QnAConfig};

/// Bot config. Use BotConfig::load() for env-based loading, then validate().
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub qna: QnAConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `port` is provided it overrides port/PORT.
    pub fn load(port: Option<u16>) -> Result<Self> {
        let base = BaseConfig::load(port)?;
        let qna = QnAConfig::from_env();
        Ok(Self { base, qna })
    }

    /// Validate config. Call after load() to fail fast before the server starts.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.qna.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn qna(&self) -> &QnAConfig {
        &self.qna
    }

    pub fn port(&self) -> u16 {
        self.base.port
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
}
