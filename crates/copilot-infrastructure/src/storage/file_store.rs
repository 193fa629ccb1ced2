//! Durable store backed by a single JSON document.

use async_trait::async_trait;
use copilot_core::CopilotError;
use copilot_core::error::Result;
use copilot_core::storage::KeyValueStore;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::atomic_json::AtomicJsonFile;

type Document = BTreeMap<String, String>;

/// Durable store that keeps every key in one JSON object on disk.
///
/// Values are the raw JSON strings handed in by the adapter, so the file looks
/// like `{"chatHistory": "[\"c-1\"]"}`.
#[derive(Clone)]
pub struct JsonFileStore {
    file: Arc<AtomicJsonFile<Document>>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }

    async fn modify<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Document) + Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || {
            file.update(
                Document::new(),
                |err| {
                    tracing::warn!(
                        "Durable store {:?} is corrupt, starting over: {}",
                        file.path(),
                        err
                    );
                    Some(Document::new())
                },
                f,
            )
        })
        .await
        .map_err(|e| CopilotError::internal(format!("Failed to join task: {}", e)))??;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let file = self.file.clone();
        let document = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| CopilotError::internal(format!("Failed to join task: {}", e)))??;
        Ok(document.and_then(|mut doc| doc.remove(key)))
    }

    async fn set_raw(&self, key: &str, raw: String) -> Result<()> {
        let key = key.to_string();
        tracing::debug!("Durable store: set {}", key);
        self.modify(move |doc| {
            doc.insert(key, raw);
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        tracing::debug!("Durable store: remove {}", key);
        self.modify(move |doc| {
            doc.remove(&key);
        })
        .await
    }
}
