//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::BotConfig;

#[derive(Parser)]
#[command(name = "qna-bot")]
#[command(about = "QnA Maker bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot's webhook server (config from env; port can override port/PORT).
    Run {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Load BotConfig from environment. If `port` is provided it overrides `port` / `PORT`.
pub fn load_config(port: Option<u16>) -> Result<BotConfig> {
    BotConfig::load(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_port() {
        let cli = Cli::try_parse_from(["qna-bot", "run", "--port", "4000"]).unwrap();
        match cli.command {
            Commands::Run { port } => assert_eq!(port, Some(4000)),
        }
    }

    #[test]
    fn test_parse_run_without_port() {
        let cli = Cli::try_parse_from(["qna-bot", "run"]).unwrap();
        match cli.command {
            Commands::Run { port } => assert_eq!(port, None),
        }
    }
}
