//! Interaction controller.
//!
//! Maps user intents onto conversation state, history and the backend. Each
//! action follows `idle -> sending -> (success | error) -> idle` for its own
//! control: the user message is appended before the request goes out, the
//! reply (or a fallback) after it comes back. Failures are logged and turned
//! into a bot message; nothing escapes to the caller.

mod command;
mod flight;

pub use command::{Command, CommandOutcome, Listing, Selection, UploadReport, UploadStatus};
pub use flight::{Control, FlightGuard, InFlight};

use copilot_core::config::ClientConfig;
use copilot_core::conversation::{Message, Sender, UploadedFile};
use copilot_core::gateway::BackendGateway;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::conversation_state::ConversationState;
use crate::history_index::HistoryIndex;

pub const CHAT_FALLBACK: &str = "Sorry, there was an error processing your request. Please try again.";
pub const FILE_QUESTION_FALLBACK: &str = "Sorry, there was an error processing your file question.";

/// One per client session. Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct InteractionController {
    state: ConversationState,
    history: HistoryIndex,
    gateway: Arc<dyn BackendGateway>,
    config: Arc<ClientConfig>,
    selection: Arc<RwLock<Selection>>,
    uploads: Arc<RwLock<Vec<UploadedFile>>>,
    in_flight: InFlight,
}

impl InteractionController {
    pub fn new(
        state: ConversationState,
        history: HistoryIndex,
        gateway: Arc<dyn BackendGateway>,
        config: ClientConfig,
    ) -> Self {
        let selection = Selection {
            model: config.default_model.clone(),
            task: None,
        };
        Self {
            state,
            history,
            gateway,
            config: Arc::new(config),
            selection: Arc::new(RwLock::new(selection)),
            uploads: Arc::new(RwLock::new(Vec::new())),
            in_flight: InFlight::new(),
        }
    }

    /// Routes a command to the matching operation.
    pub async fn dispatch(&self, command: Command) -> CommandOutcome {
        match command {
            Command::SendMessage(text) => self.send_message(&text).await,
            Command::AskAboutFile { file, question } => {
                self.ask_about_file(&file, &question).await
            }
            Command::UploadFiles(files) => self.upload_files(files).await,
            Command::AskAboutUpload { name, question } => {
                self.ask_about_upload(&name, &question).await
            }
            Command::SelectConversation(id) => self.select_conversation(&id).await,
            Command::ClearChat => self.clear_chat().await,
            Command::RefreshFiles => self.refresh_files().await,
            Command::RefreshConversations => self.refresh_conversations().await,
            Command::ShowHistory => CommandOutcome::History(self.history.list().await),
            Command::SelectModel(model) => {
                let mut selection = self.selection.write().await;
                selection.model = model;
                CommandOutcome::SelectionChanged(selection.clone())
            }
            Command::SelectTask(task) => {
                let mut selection = self.selection.write().await;
                selection.task = task;
                CommandOutcome::SelectionChanged(selection.clone())
            }
        }
    }

    /// Messages to show when the client starts.
    pub async fn messages(&self) -> Vec<Message> {
        self.state.load_messages().await
    }

    pub async fn active_conversation(&self) -> Option<String> {
        self.state.active_id().await
    }

    pub async fn selection(&self) -> Selection {
        self.selection.read().await.clone()
    }

    /// Names of files uploaded this session, in upload order.
    pub async fn uploaded_files(&self) -> Vec<String> {
        self.uploads
            .read()
            .await
            .iter()
            .map(|f| f.name.clone())
            .collect()
    }

    pub fn is_busy(&self, control: &Control) -> bool {
        self.in_flight.is_busy(control)
    }

    pub async fn send_message(&self, input: &str) -> CommandOutcome {
        let text = input.trim();
        if text.is_empty() {
            return CommandOutcome::Ignored;
        }
        let Some(_flight) = self.in_flight.begin(Control::MessageInput) else {
            return CommandOutcome::Busy(Control::MessageInput);
        };

        let mut appended = vec![self.append(text, Sender::User).await];

        let (model, task) = self.chat_selection().await;
        let payload = format!("Task: {}\nModel: {}\n\n{}", task, model, text);
        let active_id = self.state.active_id().await;

        let reply = match self.gateway.chat(&payload, active_id.as_deref()).await {
            Ok(reply) => {
                self.adopt_conversation_id(active_id.as_deref(), &reply.conversation_id)
                    .await;
                reply.response
            }
            Err(e) => {
                tracing::error!("Chat request failed: {}", e);
                CHAT_FALLBACK.to_string()
            }
        };

        appended.push(self.append(&reply, Sender::Bot).await);
        CommandOutcome::Appended(appended)
    }

    /// Asks the RAG endpoint about a file the backend has indexed.
    pub async fn ask_about_file(&self, file: &str, question: &str) -> CommandOutcome {
        let question = question.trim();
        if question.is_empty() {
            return CommandOutcome::Ignored;
        }
        let control = Control::ListedFile(file.to_string());
        let Some(_flight) = self.in_flight.begin(control.clone()) else {
            return CommandOutcome::Busy(control);
        };

        let mut appended = vec![
            self.append(&format!("(File: {})\n{}", file, question), Sender::User)
                .await,
        ];

        let rag_question = format!("File: {}\n{}", file, question);
        let answer = match self.gateway.rag_query(&rag_question).await {
            Ok(answer) => answer.answer,
            Err(e) => {
                tracing::error!("File question about {} failed: {}", file, e);
                FILE_QUESTION_FALLBACK.to_string()
            }
        };

        appended.push(self.append(&answer, Sender::Bot).await);
        CommandOutcome::Appended(appended)
    }

    /// Runs the upload task over each file in turn and keeps them for later questions.
    pub async fn upload_files(&self, files: Vec<UploadedFile>) -> CommandOutcome {
        if files.is_empty() {
            return CommandOutcome::Ignored;
        }
        let Some(_flight) = self.in_flight.begin(Control::FileUpload) else {
            return CommandOutcome::Busy(Control::FileUpload);
        };

        let (model, task) = self.upload_selection().await;
        let mut reports = Vec::with_capacity(files.len());

        for file in files {
            let status = match self.gateway.run_task(&model, &task, &file).await {
                Ok(output) => UploadStatus::Uploaded {
                    output: output.display_text(),
                },
                Err(e) => {
                    tracing::error!("Upload of {} failed: {}", file.name, e);
                    UploadStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            reports.push(UploadReport {
                name: file.name.clone(),
                status,
            });
            self.register_upload(file).await;
        }

        CommandOutcome::Uploaded(reports)
    }

    /// Re-submits an uploaded file and appends the task output.
    ///
    /// The question is shown in the conversation but the backend only
    /// receives the file with the current model and task.
    pub async fn ask_about_upload(&self, name: &str, question: &str) -> CommandOutcome {
        let question = question.trim();
        if question.is_empty() {
            return CommandOutcome::Ignored;
        }
        let Some(file) = self.find_upload(name).await else {
            return CommandOutcome::UnknownUpload(name.to_string());
        };
        let control = Control::UploadedFile(name.to_string());
        let Some(_flight) = self.in_flight.begin(control.clone()) else {
            return CommandOutcome::Busy(control);
        };

        let mut appended = vec![
            self.append(&format!("(File: {})\n{}", name, question), Sender::User)
                .await,
        ];

        let (model, task) = self.upload_selection().await;
        let reply = match self.gateway.run_task(&model, &task, &file).await {
            Ok(output) => output.display_text(),
            Err(e) => {
                tracing::error!("File question about upload {} failed: {}", name, e);
                FILE_QUESTION_FALLBACK.to_string()
            }
        };

        appended.push(self.append(&reply, Sender::Bot).await);
        CommandOutcome::Appended(appended)
    }

    /// Resumes a conversation from history or the backend listing.
    pub async fn select_conversation(&self, id: &str) -> CommandOutcome {
        let id = id.trim();
        if id.is_empty() {
            return CommandOutcome::Ignored;
        }
        if let Err(e) = self.state.set_active_id(id).await {
            tracing::error!("Failed to store active conversation {}: {}", id, e);
        }
        tracing::info!("Resumed conversation {}", id);
        CommandOutcome::ConversationSelected(id.to_string())
    }

    /// Wipes the session messages, the active id, the durable history and the uploads.
    pub async fn clear_chat(&self) -> CommandOutcome {
        if let Err(e) = self.state.clear().await {
            tracing::error!("Failed to clear session messages: {}", e);
        }
        if let Err(e) = self.history.clear_all().await {
            tracing::error!("Failed to clear conversation history: {}", e);
        }
        self.uploads.write().await.clear();
        tracing::info!("Chat cleared");
        CommandOutcome::Cleared
    }

    pub async fn refresh_files(&self) -> CommandOutcome {
        let Some(_flight) = self.in_flight.begin(Control::FileListing) else {
            return CommandOutcome::Busy(Control::FileListing);
        };
        let listing = match self.gateway.list_files().await {
            Ok(files) => Listing::from_items(files),
            Err(e) => {
                tracing::error!("Failed to list files: {}", e);
                Listing::Unavailable
            }
        };
        CommandOutcome::Files(listing)
    }

    pub async fn refresh_conversations(&self) -> CommandOutcome {
        let Some(_flight) = self.in_flight.begin(Control::ConversationListing) else {
            return CommandOutcome::Busy(Control::ConversationListing);
        };
        let listing = match self.gateway.list_conversations().await {
            Ok(ids) => Listing::from_items(ids),
            Err(e) => {
                tracing::error!("Failed to list conversations: {}", e);
                Listing::Unavailable
            }
        };
        CommandOutcome::Conversations(listing)
    }

    /// Builds, stores and returns a message. A failed write is logged; the
    /// message is still returned for display.
    async fn append(&self, content: &str, sender: Sender) -> Message {
        let message = Message::new(content, sender);
        if let Err(e) = self.state.append(message.clone()).await {
            tracing::error!("Failed to persist message {}: {}", message.id, e);
        }
        message
    }

    /// The id is sticky: the first one the server hands out wins for the
    /// session, later differing ids are logged and ignored. The decision is
    /// made against the state at reply time, so a resume or clear issued
    /// while the request was pending takes precedence.
    async fn adopt_conversation_id(&self, sent_with: Option<&str>, returned: &str) {
        let id = match self.state.adopt_server_id(sent_with, returned).await {
            Ok(Some(id)) => id,
            Ok(None) => return,
            Err(e) => {
                tracing::error!("Failed to store conversation id {}: {}", returned, e);
                return;
            }
        };

        if let Err(e) = self.history.record_if_new(&id).await {
            tracing::error!("Failed to record conversation {} in history: {}", id, e);
        }
    }

    async fn chat_selection(&self) -> (String, String) {
        let selection = self.selection.read().await;
        let task = selection
            .task
            .clone()
            .unwrap_or_else(|| self.config.chat_task.clone());
        (selection.model.clone(), task)
    }

    async fn upload_selection(&self) -> (String, String) {
        let selection = self.selection.read().await;
        let task = selection
            .task
            .clone()
            .unwrap_or_else(|| self.config.upload_task.clone());
        (selection.model.clone(), task)
    }

    async fn register_upload(&self, file: UploadedFile) {
        let mut uploads = self.uploads.write().await;
        match uploads.iter_mut().find(|known| known.name == file.name) {
            Some(known) => *known = file,
            None => uploads.push(file),
        }
    }

    async fn find_upload(&self, name: &str) -> Option<UploadedFile> {
        self.uploads
            .read()
            .await
            .iter()
            .find(|f| f.name == name)
            .cloned()
    }
}
