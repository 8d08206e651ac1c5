//! # Handler chain
//!
//! Runs a sequence of handlers for each turn. Each handler has optional before/handle/after: all
//! before run in order (any false stops the chain); then handle runs until Stop; then
//! all after run in reverse. After hooks also run when a before or handle hook failed, so
//! turn-level postconditions such as saving state hold on the error path too.

use bot_core::{Handler, HandlerResponse, Result, TurnContext};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Chain of handlers: before (all) → handle (until Stop) → after (reverse).
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs all before → handle until Stop → all after in reverse.
    ///
    /// A before hook returning false ends the turn with `Stop` and skips every after hook.
    /// An error from before or handle ends those phases; after hooks still run (with `Stop`)
    /// and the first error is returned. Errors from after hooks are returned only when the
    /// earlier phases succeeded.
    #[instrument(skip(self, ctx))]
    pub async fn handle(&self, ctx: &TurnContext) -> Result<HandlerResponse> {
        let activity = ctx.activity();
        info!(
            activity_type = ?activity.activity_type,
            conversation_id = ?activity.conversation_id(),
            activity_id = ?activity.id,
            "step: handler_chain started"
        );

        let outcome = self.run_before_and_handle(ctx).await;
        let (final_response, mut first_error) = match outcome {
            Ok(None) => return Ok(HandlerResponse::Stop),
            Ok(Some(response)) => (response, None),
            Err(e) => {
                error!(error = %e, "step: handler chain failed, running after hooks");
                (HandlerResponse::Stop, Some(e))
            }
        };

        for h in self.handlers.iter().rev() {
            let name = std::any::type_name_of_val(h.as_ref());
            info!(handler = %name, "step: handler after");
            if let Err(e) = h.after(ctx, &final_response).await {
                error!(handler = %name, error = %e, "step: handler after failed");
                if first_error.is_none() {
                    first_error = Some(e);
                }
                continue;
            }
            info!(handler = %name, "step: handler after done");
        }

        info!(
            conversation_id = ?activity.conversation_id(),
            activity_id = ?activity.id,
            failed = first_error.is_some(),
            "step: handler_chain finished"
        );

        match first_error {
            Some(e) => Err(e),
            None => Ok(final_response),
        }
    }

    /// Before phase then handle phase. `Ok(None)` means a before hook stopped the chain.
    async fn run_before_and_handle(&self, ctx: &TurnContext) -> Result<Option<HandlerResponse>> {
        for h in &self.handlers {
            let name = std::any::type_name_of_val(h.as_ref());
            info!(handler = %name, "step: handler before");
            if !h.before(ctx).await? {
                info!(handler = %name, "step: before returned false, chain stopped");
                return Ok(None);
            }
        }

        for h in &self.handlers {
            let name = std::any::type_name_of_val(h.as_ref());
            info!(handler = %name, "step: handler handle");
            let response = h.handle(ctx).await?;
            info!(handler = %name, response = ?response, "step: handler handle done");

            if response == HandlerResponse::Stop {
                info!("step: handler chain stopped by handler");
                return Ok(Some(response));
            }
        }

        Ok(Some(HandlerResponse::Continue))
    }
}

// Integration tests live in tests/handler_chain_test.rs
