//! HttpBackendGateway - REST implementation of the Copilot backend contract.
//!
//! JSON bodies for chat and RAG queries, multipart for file-bearing task runs.
//! The base URL is resolved from the current config on every request.

use async_trait::async_trait;
use copilot_core::config::ClientConfig;
use copilot_core::conversation::UploadedFile;
use copilot_core::error::{CopilotError, Result};
use copilot_core::gateway::{
    BackendGateway, ChatReply, ChatRequest, ConversationList, FileList, RagAnswer, RagQuery,
    TaskOutput,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

const LIST_FILES_PATH: &str = "/list-files/";
const LIST_CONVERSATIONS_PATH: &str = "/list-conversations/";
const RAG_QUERY_PATH: &str = "/rag-query/";
const RUN_TASK_PATH: &str = "/run_task";
const CHAT_PATH: &str = "/chat";

/// Gateway that talks to the backend over HTTP.
#[derive(Clone)]
pub struct HttpBackendGateway {
    client: Client,
    config: Arc<RwLock<ClientConfig>>,
}

impl HttpBackendGateway {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CopilotError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// Changes the host used for endpoint selection. Takes effect on the next request.
    pub async fn set_host(&self, host: impl Into<String>) {
        self.config.write().await.host = host.into();
    }

    /// Base URL for the request about to be made.
    pub async fn base_url(&self) -> String {
        self.config.read().await.base_url().to_string()
    }

    async fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url().await, path)
    }

    async fn send<T>(&self, endpoint: &str, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|err| {
            CopilotError::transport(format!("{} request failed: {}", endpoint, err))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            tracing::debug!("{} returned {}: {}", endpoint, status, body_text);
            return Err(CopilotError::http_status(
                status.as_u16(),
                format!("{} failed: {}", endpoint, body_text),
            ));
        }

        let body = response.text().await.map_err(|err| {
            CopilotError::transport(format!("Failed to read {} response: {}", endpoint, err))
        })?;

        serde_json::from_str(&body).map_err(|err| CopilotError::malformed(endpoint, err.to_string()))
    }
}

#[async_trait]
impl BackendGateway for HttpBackendGateway {
    async fn list_files(&self) -> Result<Vec<String>> {
        let url = self.url(LIST_FILES_PATH).await;
        tracing::debug!("GET {}", url);
        let list: FileList = self.send(LIST_FILES_PATH, self.client.get(&url)).await?;
        Ok(list.files)
    }

    async fn list_conversations(&self) -> Result<Vec<String>> {
        let url = self.url(LIST_CONVERSATIONS_PATH).await;
        tracing::debug!("GET {}", url);
        let list: ConversationList = self
            .send(LIST_CONVERSATIONS_PATH, self.client.get(&url))
            .await?;
        Ok(list.conversations)
    }

    async fn chat(&self, message: &str, conversation_id: Option<&str>) -> Result<ChatReply> {
        let url = self.url(CHAT_PATH).await;
        tracing::debug!("POST {} (conversation: {:?})", url, conversation_id);
        let body = ChatRequest {
            message: message.to_string(),
            conversation_id: conversation_id.map(str::to_string),
        };
        self.send(CHAT_PATH, self.client.post(&url).json(&body)).await
    }

    async fn rag_query(&self, question: &str) -> Result<RagAnswer> {
        let url = self.url(RAG_QUERY_PATH).await;
        tracing::debug!("POST {}", url);
        let body = RagQuery {
            question: question.to_string(),
        };
        self.send(RAG_QUERY_PATH, self.client.post(&url).json(&body))
            .await
    }

    async fn run_task(&self, model: &str, task: &str, file: &UploadedFile) -> Result<TaskOutput> {
        let url = self.url(RUN_TASK_PATH).await;
        tracing::debug!("POST {} ({} bytes of {})", url, file.len(), file.name);

        let mime = mime_guess::from_path(&file.name).first_or_octet_stream();
        let part = Part::bytes(file.bytes.as_ref().clone())
            .file_name(file.name.clone())
            .mime_str(mime.as_ref())
            .map_err(|e| CopilotError::internal(format!("Invalid mime type {}: {}", mime, e)))?;
        let form = Form::new()
            .text("model", model.to_string())
            .text("task", task.to_string())
            .part("file", part);

        let raw: serde_json::Value = self
            .send(RUN_TASK_PATH, self.client.post(&url).multipart(form))
            .await?;
        if !raw.is_object() {
            return Err(CopilotError::malformed(RUN_TASK_PATH, "expected a JSON object"));
        }
        let output = raw
            .get("output")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        Ok(TaskOutput { output, raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_base_url_follows_host_changes() {
        let gateway = HttpBackendGateway::new(ClientConfig::default()).unwrap();
        assert_eq!(gateway.base_url().await, "http://localhost:8000");

        gateway.set_host("copilot.example.com").await;
        assert_eq!(
            gateway.base_url().await,
            copilot_core::config::DEFAULT_DEPLOYED_BASE_URL
        );
    }
}
