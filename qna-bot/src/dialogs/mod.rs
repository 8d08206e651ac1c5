//! Dialogs run by the bot for message turns.

mod qna_dialog;

use async_trait::async_trait;
use bot_core::{Result, TurnContext};
use bot_state::StatePropertyAccessor;

pub use qna_dialog::{DialogState, QnADialogOptions, QnAMakerDialog, Suggestion};

/// A unit of conversational logic run once per message turn. State that must survive to the
/// next turn is written through `state`; the caller persists it.
#[async_trait]
pub trait Dialog: Send + Sync {
    async fn run(
        &self,
        ctx: &TurnContext,
        state: &StatePropertyAccessor<DialogState>,
    ) -> Result<()>;
}
