use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, instrument};

use bot_core::init_tracing;

use crate::components::{build_adapter, build_bot_components};
use crate::config::BotConfig;
use crate::server::{build_router, serve};

/// Main entry: validate config, init logging, build components and adapter, then serve the
/// webhook until the process exits.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(Some(Path::new(config.log_file())))?;

    info!(
        port = config.port(),
        log_file = %config.log_file(),
        "Initializing bot"
    );

    let components = build_bot_components(&config)?;
    let adapter = Arc::new(build_adapter(&components));
    let router = build_router(adapter);

    info!("Bot started successfully");
    serve(router, config.port()).await
}
