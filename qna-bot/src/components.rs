//! Component factory: builds BotComponents from config. Isolates assembly logic from runner.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, instrument};

use bot_core::Bot;
use bot_state::{BotState, MemoryStorage, Storage};
use handler_chain::HandlerChain;
use qnamaker_client::{mask_key, QnAMaker, QnAMakerClient};

use crate::adapter::{BotAdapter, OnTurnErrorHandler};
use crate::config::BotConfig;
use crate::connector::{AppCredentials, ConnectorClient};
use crate::dialogs::{Dialog, QnADialogOptions, QnAMakerDialog};
use crate::handlers::{LoggingHandler, QnABot, StateHandler};

/// Core dependencies for run_bot; produced by the component factory.
#[derive(Clone)]
pub struct BotComponents {
    pub storage: Arc<dyn Storage>,
    pub conversation_state: BotState,
    pub user_state: BotState,
    pub dialog: Arc<dyn Dialog>,
    pub bot: Arc<dyn Bot>,
}

/// Builds BotComponents: in-memory storage, both state scopes, the QnA client and dialog, and
/// the connector client.
#[instrument(skip(config))]
pub fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let endpoint = config.qna().endpoint()?;
    info!(
        knowledge_base_id = %endpoint.knowledge_base_id,
        host = %endpoint.host,
        endpoint_key = %mask_key(&endpoint.endpoint_key),
        "Using QnA Maker endpoint"
    );
    let qna: Arc<dyn QnAMaker> = Arc::new(QnAMakerClient::new(endpoint));
    let options = QnADialogOptions::with_default_answer(config.qna().default_answer.as_deref());

    let credentials = match (&config.base().app_id, &config.base().app_password) {
        (Some(app_id), Some(app_password)) => Some(AppCredentials {
            app_id: app_id.clone(),
            app_password: app_password.clone(),
        }),
        _ => None,
    };
    info!(
        authenticated = credentials.is_some(),
        "Using bot connector client"
    );
    let bot: Arc<dyn Bot> = Arc::new(ConnectorClient::new(credentials));

    Ok(assemble_components(qna, options, bot))
}

/// Wires components around a given QnA service and outbound transport (used by tests).
pub fn assemble_components(
    qna: Arc<dyn QnAMaker>,
    options: QnADialogOptions,
    bot: Arc<dyn Bot>,
) -> BotComponents {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let conversation_state = BotState::conversation(storage.clone());
    let user_state = BotState::user(storage.clone());
    let dialog: Arc<dyn Dialog> = Arc::new(QnAMakerDialog::new(qna, options));
    BotComponents {
        storage,
        conversation_state,
        user_state,
        dialog,
        bot,
    }
}

/// Builds the handler chain (logging → state persistence → QnA bot).
pub fn build_handler_chain(components: &BotComponents) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(StateHandler::new(
            components.conversation_state.clone(),
            components.user_state.clone(),
        )))
        .add_handler(Arc::new(QnABot::new(
            &components.conversation_state,
            components.dialog.clone(),
        )))
}

/// Builds the adapter with the default turn-error handler.
pub fn build_adapter(components: &BotComponents) -> BotAdapter {
    BotAdapter::new(
        build_handler_chain(components),
        components.bot.clone(),
        Arc::new(OnTurnErrorHandler),
    )
}
