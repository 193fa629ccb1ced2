//! Storage layer: the two key-value stores and the typed adapter over them.

mod adapter;
mod atomic_json;
mod file_store;
mod memory_store;

pub use adapter::StorageAdapter;
pub use atomic_json::{AtomicJsonError, AtomicJsonFile};
pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;
