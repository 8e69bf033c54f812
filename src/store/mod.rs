//! Persistence of transaction collections.
//!
//! The device offers a plain key-value store: a whole value is read or written at once, with no
//! partial updates. `KeyValueStore` is that contract. `TransactionStore` builds on it, keeping one
//! JSON array of transactions per user under a namespaced key and making sure that only one
//! read-modify-write per user is in flight at a time.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::{ErrorType, IntoResult};
use crate::model::StoredTransaction;
use crate::Result;
use anyhow::{ensure, Context};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, trace};

/// The namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "@gofinances";

/// A whole-value key-value store, such as the storage a mobile device provides to an app.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing has been stored.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// The identity whose transactions are being read or written. Supplied by the identity provider
/// and otherwise opaque.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        ensure!(!id.trim().is_empty(), "The user id cannot be empty");
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Reads and writes the full transaction collection of each user.
#[derive(Clone)]
pub struct TransactionStore {
    kv: Arc<dyn KeyValueStore>,
    namespace: String,
    locks: Arc<Mutex<HashMap<UserId, Arc<Mutex<()>>>>>,
}

impl TransactionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            kv,
            namespace: namespace.into(),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The storage key of a user's collection: `<namespace>:transactions_user:<user id>`.
    pub fn key(&self, user: &UserId) -> String {
        format!("{}:transactions_user:{}", self.namespace, user)
    }

    /// Reads the user's collection. A key that has never been written is an empty collection.
    ///
    /// Errors are tagged `StorageRead`, including a stored value that is not a JSON array.
    /// Elements of the array are not checked here; see `model::normalize`.
    pub async fn read(&self, user: &UserId) -> Result<Vec<StoredTransaction>> {
        let key = self.key(user);
        trace!("Reading {key}");
        let raw = self
            .kv
            .get(&key)
            .await
            .with_context(|| format!("Unable to read the transactions of user {user}"))
            .pub_result(ErrorType::StorageRead)?;
        let Some(raw) = raw else {
            debug!("No transactions stored for user {user}");
            return Ok(Vec::new());
        };
        let records: Vec<StoredTransaction> = serde_json::from_str(&raw)
            .with_context(|| format!("The stored transactions of user {user} are corrupt"))
            .pub_result(ErrorType::StorageRead)?;
        debug!("Read {} stored transactions for user {user}", records.len());
        Ok(records)
    }

    /// Replaces the user's collection with `records`. Errors are tagged `StorageWrite`.
    pub async fn write(&self, user: &UserId, records: &[StoredTransaction]) -> Result<()> {
        let key = self.key(user);
        let json = serde_json::to_string(records)
            .context("Unable to serialize transactions")
            .pub_result(ErrorType::StorageWrite)?;
        self.kv
            .set(&key, &json)
            .await
            .with_context(|| format!("Unable to save the transactions of user {user}"))
            .pub_result(ErrorType::StorageWrite)?;
        debug!("Wrote {} transactions for user {user}", records.len());
        Ok(())
    }

    /// Waits for, and returns, exclusive write access to the user's collection. Hold the guard
    /// across a read-modify-write so that concurrent updates cannot overwrite each other.
    pub async fn lock(&self, user: &UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(user.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_type;
    use crate::test::FailingStore;
    use serde_json::json;
    use std::time::Duration;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn store() -> (Arc<MemoryStore>, TransactionStore) {
        let kv = Arc::new(MemoryStore::default());
        let store = TransactionStore::new(kv.clone(), DEFAULT_NAMESPACE);
        (kv, store)
    }

    #[test]
    fn test_user_id_rejects_empty() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
        assert_eq!(user("42").as_str(), "42");
    }

    #[test]
    fn test_key_format() {
        let (_, store) = store();
        assert_eq!(store.key(&user("42")), "@gofinances:transactions_user:42");
    }

    #[tokio::test]
    async fn test_read_missing_key_is_empty() {
        let (_, store) = store();
        assert!(store.read(&user("nobody")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let (kv, store) = store();
        let records: Vec<StoredTransaction> = serde_json::from_value(json!([
            { "id": "1", "type": "positive", "amount": "10", "date": "2023-01-01", "name": "Gift" }
        ]))
        .unwrap();
        store.write(&user("a"), &records).await.unwrap();
        assert_eq!(store.read(&user("a")).await.unwrap(), records);
        assert!(store.read(&user("b")).await.unwrap().is_empty());

        let raw = kv
            .get("@gofinances:transactions_user:a")
            .await
            .unwrap()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["name"], json!("Gift"));
    }

    #[tokio::test]
    async fn test_read_corrupt_value() {
        let (kv, store) = store();
        kv.set("@gofinances:transactions_user:a", "{\"not\":\"an array\"}")
            .await
            .unwrap();
        let e = store.read(&user("a")).await.unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::StorageRead));
    }

    #[tokio::test]
    async fn test_read_failure_is_tagged() {
        let kv = Arc::new(FailingStore::new(MemoryStore::default()));
        kv.fail_reads(true);
        let store = TransactionStore::new(kv, DEFAULT_NAMESPACE);
        let e = store.read(&user("a")).await.unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::StorageRead));
    }

    #[tokio::test]
    async fn test_write_failure_is_tagged() {
        let kv = Arc::new(FailingStore::new(MemoryStore::default()));
        kv.fail_writes(true);
        let store = TransactionStore::new(kv, DEFAULT_NAMESPACE);
        let e = store.write(&user("a"), &[]).await.unwrap_err();
        assert_eq!(error_type(&e), Some(ErrorType::StorageWrite));
    }

    #[tokio::test]
    async fn test_lock_is_per_user() {
        let (_, store) = store();
        let _a = store.lock(&user("a")).await;
        // A different user is not blocked
        let b = tokio::time::timeout(Duration::from_millis(100), store.lock(&user("b"))).await;
        assert!(b.is_ok());
        // The same user is
        let a2 = tokio::time::timeout(Duration::from_millis(100), store.lock(&user("a"))).await;
        assert!(a2.is_err());
    }
}
