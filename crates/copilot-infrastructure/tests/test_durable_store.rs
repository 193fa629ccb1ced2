use copilot_core::storage::{CHAT_HISTORY_KEY, KeyValueStore, StoreScope};
use copilot_infrastructure::{CopilotPaths, JsonFileStore, MemoryStore, StorageAdapter, default_storage};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_values_survive_a_new_store_instance() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage.json");

    let first = JsonFileStore::new(path.clone());
    first
        .set_raw(CHAT_HISTORY_KEY, r#"["c-1","c-2"]"#.to_string())
        .await
        .expect("Should write durable value");

    // A later client session opens the same file
    let second = JsonFileStore::new(path);
    let raw = second.get_raw(CHAT_HISTORY_KEY).await.unwrap();
    assert_eq!(raw.as_deref(), Some(r#"["c-1","c-2"]"#));
}

#[tokio::test]
async fn test_remove_only_touches_one_key() {
    let temp_dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(temp_dir.path().join("storage.json"));

    store.set_raw("a", "1".to_string()).await.unwrap();
    store.set_raw("b", "2".to_string()).await.unwrap();
    store.remove("a").await.unwrap();

    assert!(store.get_raw("a").await.unwrap().is_none());
    assert_eq!(store.get_raw("b").await.unwrap().as_deref(), Some("2"));
}

#[tokio::test]
async fn test_corrupt_file_degrades_reads_and_recovers_on_write() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage.json");
    std::fs::write(&path, "not json at all").unwrap();

    let store = Arc::new(JsonFileStore::new(path));
    assert!(store.get_raw(CHAT_HISTORY_KEY).await.is_err());

    let adapter = StorageAdapter::new(Arc::new(MemoryStore::new()), store.clone());
    let history: Vec<String> = adapter.get(StoreScope::Durable, CHAT_HISTORY_KEY).await;
    assert!(history.is_empty(), "Corrupt store should read as empty");

    adapter
        .set(StoreScope::Durable, CHAT_HISTORY_KEY, &vec!["c-9".to_string()])
        .await
        .expect("Write should replace the corrupt document");
    let history: Vec<String> = adapter.get(StoreScope::Durable, CHAT_HISTORY_KEY).await;
    assert_eq!(history, vec!["c-9".to_string()]);
}

#[tokio::test]
async fn test_default_storage_keeps_session_in_memory() {
    let temp_dir = TempDir::new().unwrap();
    let paths = CopilotPaths::new(Some(temp_dir.path()));

    let adapter = default_storage(&paths).unwrap();
    adapter
        .set(StoreScope::Session, "conversationId", &"c-1".to_string())
        .await
        .unwrap();
    adapter
        .set(StoreScope::Durable, CHAT_HISTORY_KEY, &vec!["c-1".to_string()])
        .await
        .unwrap();

    // A fresh session sees durable data only
    let next_session = default_storage(&paths).unwrap();
    let id: Option<String> = next_session.get(StoreScope::Session, "conversationId").await;
    let history: Vec<String> = next_session.get(StoreScope::Durable, CHAT_HISTORY_KEY).await;
    assert!(id.is_none());
    assert_eq!(history, vec!["c-1".to_string()]);
}
