//! Turn processing: wraps each inbound activity in a [`TurnContext`], runs the handler chain,
//! and routes any error that escapes the chain to the turn-error handler.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{error, info, instrument};
use uuid::Uuid;

use bot_core::{Activity, Bot, BotError, HandlerResponse, Result, TurnContext};
use handler_chain::HandlerChain;

pub const TURN_ERROR_TRACE_NAME: &str = "OnTurnError Trace";
pub const TURN_ERROR_VALUE_TYPE: &str = "https://www.botframework.com/schemas/error";
pub const TURN_ERROR_LABEL: &str = "TurnError";
pub const TURN_ERROR_MESSAGE: &str = "The bot encountered an error or bug.";
pub const TURN_ERROR_FIX_MESSAGE: &str =
    "To continue to run this bot, please fix the bot source code.";

/// Last-chance handler for errors raised while processing a turn.
#[async_trait]
pub trait TurnErrorHandler: Send + Sync {
    async fn on_turn_error(&self, ctx: &TurnContext, error: &BotError) -> Result<()>;
}

/// Logs the error, emits a trace activity carrying it (shown by the emulator), then tells the
/// user something went wrong.
pub struct OnTurnErrorHandler;

#[async_trait]
impl TurnErrorHandler for OnTurnErrorHandler {
    async fn on_turn_error(&self, ctx: &TurnContext, err: &BotError) -> Result<()> {
        error!(error = %err, "[onTurnError] unhandled error");

        ctx.send_trace_activity(
            TURN_ERROR_TRACE_NAME,
            Value::String(err.to_string()),
            TURN_ERROR_VALUE_TYPE,
            TURN_ERROR_LABEL,
        )
        .await?;

        ctx.send_activity(TURN_ERROR_MESSAGE).await?;
        ctx.send_activity(TURN_ERROR_FIX_MESSAGE).await?;
        Ok(())
    }
}

/// Runs one turn per inbound activity.
pub struct BotAdapter {
    chain: HandlerChain,
    bot: Arc<dyn Bot>,
    on_turn_error: Arc<dyn TurnErrorHandler>,
}

impl BotAdapter {
    pub fn new(
        chain: HandlerChain,
        bot: Arc<dyn Bot>,
        on_turn_error: Arc<dyn TurnErrorHandler>,
    ) -> Self {
        Self {
            chain,
            bot,
            on_turn_error,
        }
    }

    /// Processes one activity. Chain errors are handed to the turn-error handler and the turn
    /// ends with `Stop`; only a failure of the error handler itself is returned.
    #[instrument(skip(self, activity), fields(turn_id = %Uuid::new_v4()))]
    pub async fn process_activity(&self, activity: Activity) -> Result<HandlerResponse> {
        info!(
            activity_type = ?activity.activity_type,
            channel_id = ?activity.channel_id(),
            conversation_id = ?activity.conversation_id(),
            "step: turn started"
        );
        let ctx = TurnContext::new(activity, self.bot.clone());

        match self.chain.handle(&ctx).await {
            Ok(response) => {
                info!(responded = ctx.responded(), "step: turn finished");
                Ok(response)
            }
            Err(e) => {
                self.on_turn_error.on_turn_error(&ctx, &e).await.map_err(|handler_err| {
                    error!(error = %handler_err, "Turn error handler failed");
                    handler_err
                })?;
                info!("step: turn finished after error");
                Ok(HandlerResponse::Stop)
            }
        }
    }
}
