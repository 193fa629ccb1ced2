pub mod config_service;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::paths::CopilotPaths;
pub use crate::storage::{JsonFileStore, MemoryStore, StorageAdapter};

use std::sync::Arc;

/// Standard wiring: in-memory session store plus the on-disk durable store.
pub fn default_storage(paths: &CopilotPaths) -> copilot_core::error::Result<StorageAdapter> {
    let durable = JsonFileStore::new(paths.storage_file()?);
    Ok(StorageAdapter::new(
        Arc::new(MemoryStore::new()),
        Arc::new(durable),
    ))
}
