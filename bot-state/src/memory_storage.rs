//! # In-memory storage
//!
//! Process-local [`Storage`] for development and tests. Items are kept serialized, so every
//! read hands out an independent copy. Data is lost on restart.
//!
//! ## Concurrency
//!
//! Each write is assigned a fresh `eTag`. A write that carries an `eTag` (other than `*`)
//! for an existing key must match the stored one, otherwise it fails with
//! [`StorageError::ETagConflict`].

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use bot_core::ETAG_PROPERTY;

use crate::error::StorageError;
use crate::storage::{Storage, StoreItem};

/// In-memory state store.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
    etag: Arc<AtomicU64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(HashMap::new())),
            etag: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Returns the number of stored keys.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn next_etag(&self) -> String {
        self.etag.fetch_add(1, Ordering::SeqCst).to_string()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn etag_of(item: &StoreItem) -> Option<&str> {
    item.get(ETAG_PROPERTY).and_then(Value::as_str)
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, StoreItem>, StorageError> {
        let items = self.items.read().await;
        let mut found = HashMap::new();
        for key in keys {
            if let Some(raw) = items.get(key) {
                let item: StoreItem = serde_json::from_str(raw)?;
                found.insert(key.clone(), item);
            }
        }
        debug!(requested = keys.len(), found = found.len(), "step: storage read");
        Ok(found)
    }

    async fn write(&self, changes: HashMap<String, StoreItem>) -> Result<(), StorageError> {
        let mut items = self.items.write().await;
        for (key, mut item) in changes {
            if let Some(raw) = items.get(&key) {
                let stored: StoreItem = serde_json::from_str(raw)?;
                if let (Some(supplied), Some(current)) = (etag_of(&item), etag_of(&stored)) {
                    if supplied != "*" && supplied != current {
                        return Err(StorageError::ETagConflict {
                            key,
                            stored: current.to_string(),
                            supplied: supplied.to_string(),
                        });
                    }
                }
            }

            let etag = self.next_etag();
            item.insert(ETAG_PROPERTY.to_string(), Value::String(etag.clone()));
            items.insert(key.clone(), serde_json::to_string(&item)?);
            info!(key = %key, etag = %etag, "step: storage write");
        }
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), StorageError> {
        let mut items = self.items.write().await;
        for key in keys {
            if items.remove(key).is_some() {
                info!(key = %key, "step: storage delete");
            }
        }
        Ok(())
    }
}
