//! User intents and their results.

use copilot_core::conversation::{Message, UploadedFile};

use super::flight::Control;

/// Everything a user can ask the client to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SendMessage(String),
    /// Ask a question about a file the backend has indexed.
    AskAboutFile { file: String, question: String },
    UploadFiles(Vec<UploadedFile>),
    /// Ask about a file uploaded earlier in this session.
    AskAboutUpload { name: String, question: String },
    SelectConversation(String),
    ClearChat,
    RefreshFiles,
    RefreshConversations,
    ShowHistory,
    SelectModel(String),
    /// `None` goes back to the configured defaults.
    SelectTask(Option<String>),
}

/// A list fetched for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Items(Vec<String>),
    Empty,
    /// The fetch failed; the error has been logged.
    Unavailable,
}

impl Listing {
    pub fn from_items(items: Vec<String>) -> Self {
        if items.is_empty() {
            Listing::Empty
        } else {
            Listing::Items(items)
        }
    }
}

/// How a single file upload went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Uploaded { output: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub name: String,
    pub status: UploadStatus,
}

impl UploadReport {
    /// One-line summary for the user.
    pub fn summary(&self) -> String {
        match &self.status {
            UploadStatus::Uploaded { output } => {
                format!("✅ {} uploaded. Output: {}", self.name, output)
            }
            UploadStatus::Failed { reason } => format!("❌ {} failed: {}", self.name, reason),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, UploadStatus::Uploaded { .. })
    }
}

/// Current model and task choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub model: String,
    pub task: Option<String>,
}

/// What happened in response to a [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Messages appended to the conversation by this action, in order.
    Appended(Vec<Message>),
    /// The control is still waiting on an earlier request.
    Busy(Control),
    /// Nothing to do (blank input, empty question).
    Ignored,
    /// No file with that name was uploaded this session.
    UnknownUpload(String),
    Files(Listing),
    Conversations(Listing),
    History(Vec<String>),
    Uploaded(Vec<UploadReport>),
    ConversationSelected(String),
    Cleared,
    SelectionChanged(Selection),
}
