//! Implements the `KeyValueStore` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that the whole app can be
//! run, top-to-bottom, without touching the disk.

use crate::store::KeyValueStore;
use crate::Result;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// An implementation of the `KeyValueStore` trait that holds everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new `MemoryStore` seeded with `data`.
    pub fn new(data: HashMap<String, String>) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _ = self
            .data
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
