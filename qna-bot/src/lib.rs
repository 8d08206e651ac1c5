//! # QnA bot application
//!
//! Wires bot-core, handler-chain, bot-state and qnamaker-client into a webhook bot that
//! answers questions from a QnA Maker knowledge base. Loads config from env and serves
//! `POST /api/messages`.

pub mod adapter;
pub mod cli;
pub mod components;
pub mod config;
pub mod connector;
pub mod dialogs;
pub mod handlers;
pub mod runner;
pub mod server;

pub use adapter::{BotAdapter, OnTurnErrorHandler, TurnErrorHandler};
pub use cli::{load_config, Cli, Commands};
pub use components::{
    assemble_components, build_adapter, build_bot_components, build_handler_chain, BotComponents,
};
pub use config::{BaseConfig, BotConfig, QnAConfig};
pub use connector::{AppCredentials, ConnectorClient};
pub use dialogs::{Dialog, DialogState, QnADialogOptions, QnAMakerDialog, Suggestion};
pub use handlers::{LoggingHandler, QnABot, StateHandler, WELCOME_TEXT};
pub use runner::run_bot;
pub use server::build_router;
