use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;

use bot_core::TurnContext;

use crate::bot_state::BotState;
use crate::error::StorageError;

/// Typed view of one named property inside a [`BotState`] scope.
pub struct StatePropertyAccessor<T> {
    state: BotState,
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StatePropertyAccessor<T>
where
    T: Serialize + DeserializeOwned + Default + Send + Sync,
{
    pub(crate) fn new(state: BotState, name: impl Into<String>) -> Self {
        Self {
            state,
            name: name.into(),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current value, or `None` when the property was never set.
    pub async fn get(&self, ctx: &TurnContext) -> Result<Option<T>, StorageError> {
        match self.state.get_property(ctx, &self.name).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Current value; when unset, stores `T::default()` and returns it.
    pub async fn get_or_default(&self, ctx: &TurnContext) -> Result<T, StorageError> {
        if let Some(value) = self.get(ctx).await? {
            return Ok(value);
        }
        let value = T::default();
        self.set(ctx, &value).await?;
        Ok(value)
    }

    pub async fn set(&self, ctx: &TurnContext, value: &T) -> Result<(), StorageError> {
        let value = serde_json::to_value(value)?;
        self.state.set_property(ctx, &self.name, value).await
    }

    pub async fn delete(&self, ctx: &TurnContext) -> Result<(), StorageError> {
        self.state.delete_property(ctx, &self.name).await
    }
}

impl<T> Clone for StatePropertyAccessor<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}
