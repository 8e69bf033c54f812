//! Implements the `KeyValueStore` trait with a single JSON file on disk.
//!
//! The file holds one JSON object mapping each key to its string value. Every `set` rewrites the
//! whole file by writing a temporary file next to it and renaming it into place, so a crash
//! mid-write leaves the previous contents intact.

use crate::store::KeyValueStore;
use crate::{utils, Result};
use anyhow::Context;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::trace;

/// A `KeyValueStore` backed by a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes access to the file within this process
    io: Mutex<()>,
}

impl FileStore {
    /// Creates a store at `path`. The file is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            io: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>> {
        if !utils::exists(&self.path).await? {
            return Ok(BTreeMap::new());
        }
        utils::deserialize(&self.path).await
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.io.lock().await;
        trace!("get {key} from {}", self.path.display());
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.io.lock().await;
        trace!("set {key} in {}", self.path.display());
        let mut data = self.load().await?;
        let _ = data.insert(key.to_string(), value.to_string());
        let json = serde_json::to_string_pretty(&data).context("Unable to serialize the store")?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        utils::write(&tmp, json).await?;
        utils::rename(&tmp, &self.path).await
    }
}
