//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::StoredTransaction;
use crate::store::{KeyValueStore, MemoryStore, TransactionStore, UserId, DEFAULT_NAMESPACE};
use crate::{Config, Result};
use anyhow::bail;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Test environment that sets up a gofinances home directory with a Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("gofinances");
        let config = Config::create(&root).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Writes the three records of `sample_records` for `user` into the configured storage file.
    pub async fn seed(&self, user: &UserId) {
        self.config
            .store()
            .write(user, &sample_records())
            .await
            .unwrap();
    }
}

/// Two incomes and one expense:
/// - `t1`: positive 100.00 on 2023-01-10
/// - `t2`: negative 30.00 on 2023-01-15
/// - `t3`: positive 50.00 on 2023-01-20
pub fn sample_records() -> Vec<StoredTransaction> {
    serde_json::from_value(json!([
        {
            "id": "t1",
            "type": "positive",
            "amount": "100.00",
            "date": "2023-01-10T12:00:00.000Z",
            "name": "Salary",
            "category": "salary"
        },
        {
            "id": "t2",
            "type": "negative",
            "amount": "30.00",
            "date": "2023-01-15T12:00:00.000Z",
            "name": "Lunch",
            "category": "food"
        },
        {
            "id": "t3",
            "type": "positive",
            "amount": "50.00",
            "date": "2023-01-20T12:00:00.000Z",
            "name": "Freelance",
            "category": "salary"
        }
    ]))
    .unwrap()
}

/// An in-memory `TransactionStore` holding `sample_records` for `user`.
pub async fn seed(user: &UserId) -> TransactionStore {
    let store = TransactionStore::new(Arc::new(MemoryStore::default()), DEFAULT_NAMESPACE);
    store.write(user, &sample_records()).await.unwrap();
    store
}

/// Wraps a `MemoryStore` and fails reads or writes on demand.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FailingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            bail!("Simulated read failure for {key}")
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("Simulated write failure for {key}")
        }
        self.inner.set(key, value).await
    }
}
