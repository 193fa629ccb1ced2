//! Conversation domain module.
//!
//! # Module Structure
//!
//! - `message`: Chat message types (`Message`, `Sender`)
//! - `upload`: In-memory file handle for upload and click-to-ask (`UploadedFile`)
//!
//! The stateful pieces (active conversation id, message list, history index)
//! live in `copilot-application` on top of the storage traits in
//! [`crate::storage`].

mod message;
mod upload;

pub use message::{Message, Sender};
pub use upload::UploadedFile;

/// Shown when the session has no messages yet. Never persisted.
pub const GREETING: &str = "Hello! I'm your Coding Copilot. How can I help you today?";
