//! Handler trait run by the handler chain for every turn.

use async_trait::async_trait;

use super::response::HandlerResponse;
use crate::turn_context::TurnContext;

/// Single handler concept: optional before / handle / after. Chain runs all before → handle until Stop → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _ctx: &TurnContext) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the turn. Return Stop to end the handle phase. Default: Continue.
    async fn handle(&self, _ctx: &TurnContext) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    /// Also runs when an earlier phase failed; `response` is then `Stop`.
    async fn after(
        &self,
        _ctx: &TurnContext,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}
