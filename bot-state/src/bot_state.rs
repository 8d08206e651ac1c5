//! Conversation- and user-scoped state backed by a [`Storage`].
//!
//! State is loaded once per turn into the [`TurnContext`] cache and written back by
//! [`BotState::save_changes`] only when it changed.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use bot_core::{Activity, CachedState, TurnContext, ETAG_PROPERTY};

use crate::error::StorageError;
use crate::property::StatePropertyAccessor;
use crate::storage::Storage;

/// Which part of the activity the storage key is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateScope {
    /// `{channelId}/conversations/{conversationId}`
    Conversation,
    /// `{channelId}/users/{fromId}`
    User,
}

/// One state scope. Cheap to clone; clones share the storage.
#[derive(Clone)]
pub struct BotState {
    storage: Arc<dyn Storage>,
    scope: StateScope,
    name: &'static str,
}

impl BotState {
    pub fn conversation(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            scope: StateScope::Conversation,
            name: "ConversationState",
        }
    }

    pub fn user(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            scope: StateScope::User,
            name: "UserState",
        }
    }

    /// Turn-state cache key for this scope.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn scope(&self) -> StateScope {
        self.scope
    }

    /// Storage key for the activity, e.g. `emulator/conversations/abc`.
    pub fn storage_key(&self, activity: &Activity) -> Result<String, StorageError> {
        let channel_id = activity
            .channel_id()
            .ok_or(StorageError::MissingKeyPart("channelId"))?;
        match self.scope {
            StateScope::Conversation => {
                let conversation_id = activity
                    .conversation_id()
                    .ok_or(StorageError::MissingKeyPart("conversation.id"))?;
                Ok(format!("{}/conversations/{}", channel_id, conversation_id))
            }
            StateScope::User => {
                let user_id = activity
                    .from_id()
                    .ok_or(StorageError::MissingKeyPart("from.id"))?;
                Ok(format!("{}/users/{}", channel_id, user_id))
            }
        }
    }

    /// Creates a typed accessor for one property of this scope.
    pub fn create_property<T>(&self, name: impl Into<String>) -> StatePropertyAccessor<T>
    where
        T: Serialize + DeserializeOwned + Default + Send + Sync,
    {
        StatePropertyAccessor::new(self.clone(), name)
    }

    /// Loads state into the turn cache. A no-op when already loaded, unless `force`.
    #[instrument(skip(self, ctx), fields(state = self.name))]
    pub async fn load(&self, ctx: &TurnContext, force: bool) -> Result<(), StorageError> {
        if !force && ctx.cached_state(self.name).await.is_some() {
            return Ok(());
        }
        let key = self.storage_key(ctx.activity())?;
        let mut items = self.storage.read(std::slice::from_ref(&key)).await?;
        let state = items.remove(&key).unwrap_or_default();
        debug!(key = %key, properties = state.len(), "step: state loaded");
        ctx.set_cached_state(self.name, CachedState::new(state)).await;
        Ok(())
    }

    /// Writes cached state to storage when it changed since load, or always when `force`.
    /// Returns whether a write happened. The write uses a `*` eTag (last write wins).
    #[instrument(skip(self, ctx), fields(state = self.name))]
    pub async fn save_changes(&self, ctx: &TurnContext, force: bool) -> Result<bool, StorageError> {
        let cached = ctx.cached_state(self.name).await;
        let changed = cached.as_ref().map(CachedState::is_changed).unwrap_or(false);
        if !force && !changed {
            debug!("step: state unchanged, save skipped");
            return Ok(false);
        }

        let key = self.storage_key(ctx.activity())?;
        let mut state = cached.map(|c| c.state).unwrap_or_default();
        state.insert(ETAG_PROPERTY.to_string(), Value::String("*".to_string()));

        let mut changes = HashMap::new();
        changes.insert(key.clone(), state.clone());
        self.storage.write(changes).await?;

        ctx.set_cached_state(self.name, CachedState::new(state)).await;
        info!(key = %key, "step: state saved");
        Ok(true)
    }

    /// Empties the cached state; the next save writes the empty object. Loads the scope
    /// first so the baseline reflects what is stored.
    pub async fn clear(&self, ctx: &TurnContext) -> Result<(), StorageError> {
        self.load(ctx, false).await?;
        ctx.update_cached_state(self.name, |c| c.state.clear()).await;
        Ok(())
    }

    /// Drops the cached state and removes the stored item.
    pub async fn delete(&self, ctx: &TurnContext) -> Result<(), StorageError> {
        ctx.remove_cached_state(self.name).await;
        let key = self.storage_key(ctx.activity())?;
        self.storage.delete(&[key]).await
    }

    /// Reads one raw property, loading the scope first.
    pub(crate) async fn get_property(
        &self,
        ctx: &TurnContext,
        property: &str,
    ) -> Result<Option<Value>, StorageError> {
        self.load(ctx, false).await?;
        Ok(ctx
            .update_cached_state(self.name, |c| c.state.get(property).cloned())
            .await
            .flatten())
    }

    pub(crate) async fn set_property(
        &self,
        ctx: &TurnContext,
        property: &str,
        value: Value,
    ) -> Result<(), StorageError> {
        self.load(ctx, false).await?;
        ctx.update_cached_state(self.name, |c| {
            c.state.insert(property.to_string(), value);
        })
        .await;
        Ok(())
    }

    pub(crate) async fn delete_property(
        &self,
        ctx: &TurnContext,
        property: &str,
    ) -> Result<(), StorageError> {
        self.load(ctx, false).await?;
        ctx.update_cached_state(self.name, |c| {
            c.state.remove(property);
        })
        .await;
        Ok(())
    }
}
