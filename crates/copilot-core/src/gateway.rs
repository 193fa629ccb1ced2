//! Backend gateway contract.
//!
//! Defines the request/response shapes of the Copilot backend and the trait
//! every transport implements. Calls are one-shot: no retries, no backoff.
//! A failure is returned once as `CopilotError::Network` or
//! `CopilotError::MalformedResponse`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::conversation::UploadedFile;
use crate::error::Result;

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// `None` asks the server to start a new conversation.
    pub conversation_id: Option<String>,
}

/// Response of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub conversation_id: String,
}

/// Body of `POST /rag-query/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagQuery {
    pub question: String,
}

/// Response of `POST /rag-query/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RagAnswer {
    pub answer: String,
}

/// Response of `POST /run_task`.
///
/// Some task runners answer without an `output` field; `raw` keeps the full
/// body so callers can still show something.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutput {
    pub output: Option<String>,
    pub raw: serde_json::Value,
}

impl TaskOutput {
    /// The `output` field, or the raw JSON body when it is absent.
    pub fn display_text(&self) -> String {
        self.output
            .clone()
            .unwrap_or_else(|| self.raw.to_string())
    }
}

/// Response of `GET /list-files/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<String>,
}

/// Response of `GET /list-conversations/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationList {
    #[serde(default)]
    pub conversations: Vec<String>,
}

/// The only component allowed to talk to the backend.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Files the backend has indexed for RAG.
    async fn list_files(&self) -> Result<Vec<String>>;

    /// Conversation ids known to the backend.
    async fn list_conversations(&self) -> Result<Vec<String>>;

    /// Sends a chat message. The server assigns an id when `conversation_id` is `None`.
    async fn chat(&self, message: &str, conversation_id: Option<&str>) -> Result<ChatReply>;

    async fn rag_query(&self, question: &str) -> Result<RagAnswer>;

    /// Runs `task` with `model` over an uploaded file (multipart).
    async fn run_task(&self, model: &str, task: &str, file: &UploadedFile) -> Result<TaskOutput>;
}
