//! The bot's activity handler: routes message turns to the dialog and greets new members.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use bot_core::{ActivityType, Handler, HandlerResponse, Result, TurnContext};
use bot_state::{BotState, StatePropertyAccessor};

use crate::dialogs::{Dialog, DialogState};

/// Greeting sent to each participant that joins the conversation.
pub const WELCOME_TEXT: &str =
    "Welcome to the QnA Maker sample! Ask me a question and I will try to answer it.";

/// Conversation-state property the dialog keeps its state in.
pub const DIALOG_STATE_PROPERTY: &str = "DialogState";

/// Routes activities by type. Message turns run the dialog; `conversationUpdate` turns greet
/// every added member except the bot itself. Always continues the chain so later handlers
/// (and every after hook) still run.
pub struct QnABot {
    dialog: Arc<dyn Dialog>,
    dialog_state: StatePropertyAccessor<DialogState>,
}

impl QnABot {
    pub fn new(conversation_state: &BotState, dialog: Arc<dyn Dialog>) -> Self {
        Self {
            dialog,
            dialog_state: conversation_state.create_property(DIALOG_STATE_PROPERTY),
        }
    }

    async fn on_members_added(&self, ctx: &TurnContext) -> Result<()> {
        let activity = ctx.activity();
        let recipient_id = activity.recipient_id();
        for member in &activity.members_added {
            if Some(member.id.as_str()) == recipient_id {
                continue;
            }
            info!(member_id = %member.id, "step: greeting new member");
            ctx.send_activity(WELCOME_TEXT).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Handler for QnABot {
    #[instrument(skip(self, ctx))]
    async fn handle(&self, ctx: &TurnContext) -> Result<HandlerResponse> {
        match ctx.activity().activity_type {
            ActivityType::Message => {
                info!("Running dialog with Message Activity.");
                self.dialog.run(ctx, &self.dialog_state).await?;
            }
            ActivityType::ConversationUpdate if !ctx.activity().members_added.is_empty() => {
                self.on_members_added(ctx).await?;
            }
            other => {
                debug!(activity_type = ?other, "step: activity type not handled");
            }
        }
        Ok(HandlerResponse::Continue)
    }
}
