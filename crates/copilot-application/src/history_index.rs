use copilot_core::error::Result;
use copilot_core::storage::{CHAT_HISTORY_KEY, StoreScope};
use copilot_infrastructure::StorageAdapter;

/// Durable, duplicate-free list of every conversation id seen by this client.
#[derive(Clone)]
pub struct HistoryIndex {
    storage: StorageAdapter,
}

impl HistoryIndex {
    pub fn new(storage: StorageAdapter) -> Self {
        Self { storage }
    }

    /// Adds `id` unless it is already present. Returns whether it was added.
    pub async fn record_if_new(&self, id: &str) -> Result<bool> {
        let added = self
            .storage
            .update(
                StoreScope::Durable,
                CHAT_HISTORY_KEY,
                |history: &mut Vec<String>| {
                    if history.iter().any(|known| known == id) {
                        false
                    } else {
                        history.push(id.to_string());
                        true
                    }
                },
            )
            .await?;
        if added {
            tracing::info!("Recorded conversation {} in history", id);
        }
        Ok(added)
    }

    /// Ids in the order they were first seen.
    pub async fn list(&self) -> Vec<String> {
        self.storage
            .get(StoreScope::Durable, CHAT_HISTORY_KEY)
            .await
    }

    pub async fn clear_all(&self) -> Result<()> {
        self.storage
            .remove(StoreScope::Durable, CHAT_HISTORY_KEY)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_if_new_is_idempotent() {
        let history = HistoryIndex::new(StorageAdapter::in_memory());
        assert!(history.record_if_new("c-1").await.unwrap());
        assert!(!history.record_if_new("c-1").await.unwrap());
        assert_eq!(history.list().await, vec!["c-1".to_string()]);
    }

    #[tokio::test]
    async fn test_insertion_order_is_preserved() {
        let history = HistoryIndex::new(StorageAdapter::in_memory());
        for id in ["c-3", "c-1", "c-2", "c-1"] {
            history.record_if_new(id).await.unwrap();
        }
        assert_eq!(history.list().await, vec!["c-3", "c-1", "c-2"]);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let history = HistoryIndex::new(StorageAdapter::in_memory());
        history.record_if_new("c-1").await.unwrap();
        history.clear_all().await.unwrap();
        assert!(history.list().await.is_empty());
    }
}
