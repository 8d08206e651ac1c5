//! Binary for the QnA Maker bot: loads `.env`, parses the CLI, runs the webhook server.

use anyhow::Result;
use clap::Parser;
use qna_bot::{load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { port } => {
            let config = load_config(port)?;
            run_bot(config).await
        }
    }
}
