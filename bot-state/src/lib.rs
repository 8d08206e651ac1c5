//! Bot state crate: key-value storage and conversation/user state scopes.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`storage`] – Storage trait
//! - [`memory_storage`] – MemoryStorage (process-local)
//! - [`bot_state`] – BotState (conversation / user scopes, change-tracked save)
//! - [`property`] – StatePropertyAccessor (typed property get/set)

mod bot_state;
mod error;
mod memory_storage;
mod property;
mod storage;

pub use bot_state::{BotState, StateScope};
pub use error::StorageError;
pub use memory_storage::MemoryStorage;
pub use property::StatePropertyAccessor;
pub use storage::{Storage, StoreItem};
