//! Key-value store abstraction.
//!
//! The client persists its state in two string-keyed stores: one scoped to the
//! current client session and one that survives restarts. Values are stored as
//! raw JSON text; typed decoding happens one layer up, in the storage adapter.

use async_trait::async_trait;

use crate::error::Result;

/// Session key holding the active conversation id (JSON string).
pub const CONVERSATION_ID_KEY: &str = "conversationId";
/// Session key holding the message list (JSON array of `Message`).
pub const CHAT_MESSAGES_KEY: &str = "chatMessages";
/// Durable key holding every conversation id seen (JSON array of strings).
pub const CHAT_HISTORY_KEY: &str = "chatHistory";

/// Which store a key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreScope {
    /// Cleared when the client session ends.
    Session,
    /// Persists across sessions until explicitly cleared.
    Durable,
}

/// An abstract string-keyed store of raw JSON values.
///
/// Implementations only move text around; they never interpret it.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw value under `key`.
    ///
    /// - `Ok(Some(raw))`: entry present
    /// - `Ok(None)`: no entry
    /// - `Err(_)`: the store itself could not be read
    async fn get_raw(&self, key: &str) -> Result<Option<String>>;

    /// Stores `raw` under `key`, replacing any previous value.
    async fn set_raw(&self, key: &str, raw: String) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
