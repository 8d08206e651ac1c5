use async_trait::async_trait;
use bot_core::{Handler, HandlerResponse, Result, TurnContext};
use tracing::{debug, info, instrument};

/// Logs each activity in before() and the response in after(); always continues.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, ctx))]
    async fn before(&self, ctx: &TurnContext) -> Result<bool> {
        let activity = ctx.activity();
        info!(
            activity_type = ?activity.activity_type,
            channel_id = %activity.channel_id().unwrap_or("unknown"),
            from_id = %activity.from_id().unwrap_or("unknown"),
            text = %activity.text.as_deref().unwrap_or(""),
            "Received activity"
        );
        Ok(true)
    }

    #[instrument(skip(self, ctx, response))]
    async fn after(&self, ctx: &TurnContext, response: &HandlerResponse) -> Result<()> {
        debug!(
            activity_id = ?ctx.activity().id,
            responded = ctx.responded(),
            response = ?response,
            "Processed activity"
        );
        Ok(())
    }
}
