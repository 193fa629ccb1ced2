//! Chat message types.

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the user.
    User,
    /// Message produced by the backend (or a local fallback).
    Bot,
}

/// A single entry in the session message list.
///
/// Messages are append-only: once created they are never mutated or reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique within a conversation (`msg-<uuid>`).
    pub id: String,
    pub content: String,
    pub sender: Sender,
    /// Local wall-clock time of creation, `HH:MM`.
    pub time: String,
}

impl Message {
    /// Creates a message with a fresh id stamped with the current local time.
    pub fn new(content: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: format!("msg-{}", Uuid::new_v4()),
            content: content.into(),
            sender,
            time: Local::now().format("%H:%M").to_string(),
        }
    }

    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn test_message_json_shape() {
        let json = r#"{"id":"msg-1","content":"hi","sender":"user","time":"09:30"}"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.id, "msg-1");
        assert_eq!(message.sender, Sender::User);
        assert_eq!(message.time, "09:30");
    }

    #[test]
    fn test_new_messages_have_distinct_ids() {
        let a = Message::new("a", Sender::User);
        let b = Message::new("a", Sender::User);
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("msg-"));
        assert_eq!(a.time.len(), 5);
    }
}
