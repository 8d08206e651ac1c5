//! Handler that saves conversation and user state at the end of every turn.

use async_trait::async_trait;
use tracing::{error, info, instrument};

use bot_core::{Handler, HandlerResponse, Result, TurnContext};
use bot_state::BotState;

/// Saves conversation state then user state in after(). The chain runs after hooks on the
/// error path too, so state is saved once per turn whether or not the dialog succeeded.
#[derive(Clone)]
pub struct StateHandler {
    conversation_state: BotState,
    user_state: BotState,
}

impl StateHandler {
    pub fn new(conversation_state: BotState, user_state: BotState) -> Self {
        Self {
            conversation_state,
            user_state,
        }
    }
}

#[async_trait]
impl Handler for StateHandler {
    #[instrument(skip(self, ctx, response))]
    async fn after(&self, ctx: &TurnContext, response: &HandlerResponse) -> Result<()> {
        info!(response = ?response, "step: StateHandler after, saving state");

        let conversation = self.conversation_state.save_changes(ctx, false).await;
        if let Err(ref e) = conversation {
            error!(error = %e, "Failed to save conversation state");
        }
        let user = self.user_state.save_changes(ctx, false).await;
        if let Err(ref e) = user {
            error!(error = %e, "Failed to save user state");
        }

        let conversation_written = conversation?;
        let user_written = user?;
        info!(
            conversation_written = conversation_written,
            user_written = user_written,
            "step: StateHandler after done"
        );
        Ok(())
    }
}
