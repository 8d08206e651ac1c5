//! # bot-core
//!
//! Core types and traits for the QnA bot: the activity schema, [`TurnContext`], the outbound
//! [`Bot`] transport, the [`Handler`] trait used by the handler chain, and tracing initialization.
//! Transport-agnostic; used by handler-chain, bot-state and qna-bot.

pub mod bot;
pub mod error;
pub mod logger;
pub mod turn_context;
pub mod types;

pub use bot::Bot;
pub use error::{BotError, Result};
pub use logger::init_tracing;
pub use turn_context::{CachedState, TurnContext, ETAG_PROPERTY};
pub use types::{
    Activity, ActivityType, CardAction, ChannelAccount, ConversationAccount, Handler,
    HandlerResponse, ResourceResponse, SuggestedActions,
};
