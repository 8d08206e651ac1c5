//! Base config: webhook port, logging, bot-framework app credentials. Loaded from env.

use anyhow::{Context, Result};
use std::env;

/// Port used when neither `port` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 3978;

/// Base config: server, logging and channel credentials only.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// port or PORT
    pub port: u16,
    /// Log file path
    pub log_file: String,
    /// MicrosoftAppId; `None` for local emulator runs
    pub app_id: Option<String>,
    /// MicrosoftAppPassword
    pub app_password: Option<String>,
}

impl BaseConfig {
    /// Load from environment variables. `port` overrides `port` / `PORT` if provided; blank
    /// values count as unset.
    pub fn load(port: Option<u16>) -> Result<Self> {
        let port = match port {
            Some(p) => p,
            None => match non_empty_var("port").or_else(|| non_empty_var("PORT")) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("port is not a valid port number: {}", raw))?,
                None => DEFAULT_PORT,
            },
        };
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "logs/qna-bot.log".to_string());

        Ok(Self {
            port,
            log_file,
            app_id: non_empty_var("MicrosoftAppId"),
            app_password: non_empty_var("MicrosoftAppPassword"),
        })
    }

    /// An app id without a password (or the reverse) cannot authenticate to the connector.
    pub fn validate(&self) -> Result<()> {
        match (&self.app_id, &self.app_password) {
            (Some(_), None) => anyhow::bail!("MicrosoftAppId is set but MicrosoftAppPassword is not"),
            (None, Some(_)) => anyhow::bail!("MicrosoftAppPassword is set but MicrosoftAppId is not"),
            _ => Ok(()),
        }
    }
}

/// Reads `name`, treating unset and blank the same.
pub(crate) fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
