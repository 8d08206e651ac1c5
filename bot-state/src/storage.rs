use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::StorageError;

/// Item stored under one key: a JSON object, optionally carrying an `eTag`.
pub type StoreItem = Map<String, Value>;

/// Key-value persistence for bot state.
///
/// `read` returns only the keys that exist. `write` replaces whole items. Both hand out
/// copies, so callers never share an item with the store.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, StoreItem>, StorageError>;
    async fn write(&self, changes: HashMap<String, StoreItem>) -> Result<(), StorageError>;
    async fn delete(&self, keys: &[String]) -> Result<(), StorageError>;
}
