//! Typed access to the session and durable stores.

use copilot_core::error::Result;
use copilot_core::storage::{KeyValueStore, StoreScope};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::MemoryStore;

/// Decodes JSON values out of the two stores and writes them back.
///
/// Reads never fail: a missing entry, a value that does not decode as `T`, or
/// a store that cannot be read all yield `T::default()`. Writes propagate
/// store errors.
///
/// Collections are only ever replaced whole, so every read-modify-write goes
/// through [`StorageAdapter::update`], which serializes writers.
#[derive(Clone)]
pub struct StorageAdapter {
    session: Arc<dyn KeyValueStore>,
    durable: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl StorageAdapter {
    pub fn new(session: Arc<dyn KeyValueStore>, durable: Arc<dyn KeyValueStore>) -> Self {
        Self {
            session,
            durable,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Both scopes in memory. Used by tests and by `--ephemeral` runs.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    fn store(&self, scope: StoreScope) -> &Arc<dyn KeyValueStore> {
        match scope {
            StoreScope::Session => &self.session,
            StoreScope::Durable => &self.durable,
        }
    }

    /// Reads `key` as `T`, falling back to `T::default()`.
    pub async fn get<T>(&self, scope: StoreScope, key: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let raw = match self.store(scope).get_raw(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                tracing::warn!("Failed to read {:?}/{}: {}", scope, key, e);
                return T::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Discarding malformed value at {:?}/{}: {}", scope, key, e);
                T::default()
            }
        }
    }

    pub async fn set<T>(&self, scope: StoreScope, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let raw = serde_json::to_string(value)?;
        let _guard = self.write_lock.lock().await;
        self.store(scope).set_raw(key, raw).await
    }

    pub async fn remove(&self, scope: StoreScope, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.store(scope).remove(key).await
    }

    /// Serialized read-modify-write of the whole value under `key`.
    ///
    /// Returns whatever `f` returns, after the new value has been stored.
    pub async fn update<T, F, R>(&self, scope: StoreScope, key: &str, f: F) -> Result<R>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T) -> R,
    {
        let _guard = self.write_lock.lock().await;
        let mut value: T = self.get(scope, key).await;
        let result = f(&mut value);
        let raw = serde_json::to_string(&value)?;
        self.store(scope).set_raw(key, raw).await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use copilot_core::CopilotError;

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get_raw(&self, _key: &str) -> Result<Option<String>> {
            Err(CopilotError::storage("disk on fire"))
        }

        async fn set_raw(&self, _key: &str, _raw: String) -> Result<()> {
            Err(CopilotError::storage("disk on fire"))
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            Err(CopilotError::storage("disk on fire"))
        }
    }

    #[tokio::test]
    async fn test_missing_key_yields_default() {
        let adapter = StorageAdapter::in_memory();
        let ids: Vec<String> = adapter.get(StoreScope::Durable, "chatHistory").await;
        assert!(ids.is_empty());
        let id: Option<String> = adapter.get(StoreScope::Session, "conversationId").await;
        assert!(id.is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_yields_default() {
        let session = Arc::new(MemoryStore::new());
        session
            .set_raw("chatMessages", "[{oops".to_string())
            .await
            .unwrap();
        let adapter = StorageAdapter::new(session, Arc::new(MemoryStore::new()));

        let values: Vec<String> = adapter.get(StoreScope::Session, "chatMessages").await;
        assert!(values.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_shape_yields_default() {
        let adapter = StorageAdapter::in_memory();
        adapter
            .set(StoreScope::Durable, "chatHistory", &serde_json::json!({"a": 1}))
            .await
            .unwrap();
        let ids: Vec<String> = adapter.get(StoreScope::Durable, "chatHistory").await;
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_scopes_are_independent() {
        let adapter = StorageAdapter::in_memory();
        adapter
            .set(StoreScope::Session, "k", &"session".to_string())
            .await
            .unwrap();
        let durable: Option<String> = adapter.get(StoreScope::Durable, "k").await;
        assert!(durable.is_none());
        let session: Option<String> = adapter.get(StoreScope::Session, "k").await;
        assert_eq!(session.as_deref(), Some("session"));
    }

    #[tokio::test]
    async fn test_unreadable_store_degrades_but_writes_fail() {
        let adapter = StorageAdapter::new(Arc::new(BrokenStore), Arc::new(MemoryStore::new()));
        let values: Vec<String> = adapter.get(StoreScope::Session, "k").await;
        assert!(values.is_empty());
        assert!(adapter.set(StoreScope::Session, "k", &1).await.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_updates_do_not_lose_writes() {
        let adapter = StorageAdapter::in_memory();
        let mut handles = Vec::new();
        for i in 0..32 {
            let adapter = adapter.clone();
            handles.push(tokio::spawn(async move {
                adapter
                    .update(StoreScope::Session, "list", |list: &mut Vec<u32>| list.push(i))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let list: Vec<u32> = adapter.get(StoreScope::Session, "list").await;
        assert_eq!(list.len(), 32);
    }
}
