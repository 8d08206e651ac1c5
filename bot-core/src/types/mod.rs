//! Core types: accounts, activity, card actions, handler response, and the Handler trait.
//!
//! One file per main type, mirroring the wire schema of the channel service.

mod account;
mod activity;
mod handler;
mod response;

pub use account::{ChannelAccount, ConversationAccount};
pub use activity::{Activity, ActivityType, CardAction, SuggestedActions};
pub use handler::Handler;
pub use response::{HandlerResponse, ResourceResponse};
