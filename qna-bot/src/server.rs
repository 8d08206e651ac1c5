//! HTTP surface: one webhook route, `POST /api/messages`, that feeds activities to the adapter.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, info};

use bot_core::Activity;

use crate::adapter::BotAdapter;

pub const MESSAGES_PATH: &str = "/api/messages";

#[derive(Clone)]
pub struct AppState {
    adapter: Arc<BotAdapter>,
}

/// Builds the router. Malformed bodies are rejected by the JSON extractor before a turn starts.
pub fn build_router(adapter: Arc<BotAdapter>) -> Router {
    Router::new()
        .route(MESSAGES_PATH, post(messages))
        .with_state(AppState { adapter })
}

/// 200 once the turn completed (including turn-error handling); 500 if even that failed.
async fn messages(State(state): State<AppState>, Json(activity): Json<Activity>) -> StatusCode {
    match state.adapter.process_activity(activity).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            error!(error = %e, "Turn failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Binds `0.0.0.0:{port}` and serves until the process exits.
pub async fn serve(router: Router, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Bot listening on http://{}{}", addr, MESSAGES_PATH);
    info!("Get Bot Framework Emulator: https://aka.ms/botframework-emulator");
    info!("To talk to your bot, open the emulator and select \"Open Bot\"");

    axum::serve(listener, router).await.context("Server error")?;
    Ok(())
}
