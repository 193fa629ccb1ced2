//! Session-scoped conversation state.

use copilot_core::conversation::{GREETING, Message, Sender};
use copilot_core::error::Result;
use copilot_core::storage::{CHAT_MESSAGES_KEY, CONVERSATION_ID_KEY, StoreScope};
use copilot_infrastructure::StorageAdapter;

/// Owns the active conversation id and the session message list.
///
/// Both live in the session store, so they disappear with the client
/// session. The message list is append-only; [`ConversationState::clear`] is
/// the only way to shrink it.
#[derive(Clone)]
pub struct ConversationState {
    storage: StorageAdapter,
}

impl ConversationState {
    pub fn new(storage: StorageAdapter) -> Self {
        Self { storage }
    }

    /// The current conversation id, if the backend has assigned one or one was resumed.
    pub async fn active_id(&self) -> Option<String> {
        let id: Option<String> = self
            .storage
            .get(StoreScope::Session, CONVERSATION_ID_KEY)
            .await;
        id.filter(|id| !id.is_empty())
    }

    /// Overwrites the active id for the rest of the session.
    pub async fn set_active_id(&self, id: &str) -> Result<()> {
        tracing::debug!("Active conversation: {}", id);
        self.storage
            .set(StoreScope::Session, CONVERSATION_ID_KEY, id)
            .await
    }

    /// Reconciles the id a chat reply carried with the current active id.
    ///
    /// `sent_with` is the id the request went out with. Check and write happen
    /// under one storage update, so a concurrent resume or clear is seen:
    /// - an active id is kept as is, whatever the server returned;
    /// - with no active id, `returned` is adopted only if the request was also
    ///   sent without one (the conversation was cleared otherwise).
    ///
    /// Returns the id now active for this reply, or `None` when nothing is.
    pub async fn adopt_server_id(
        &self,
        sent_with: Option<&str>,
        returned: &str,
    ) -> Result<Option<String>> {
        self.storage
            .update(
                StoreScope::Session,
                CONVERSATION_ID_KEY,
                |slot: &mut Option<String>| {
                    let current = slot.clone().filter(|id| !id.is_empty());
                    match (current, sent_with) {
                        (Some(active), _) => {
                            if active != returned {
                                tracing::warn!(
                                    "Server returned conversation id {}; keeping {}",
                                    returned,
                                    active
                                );
                            }
                            Some(active)
                        }
                        (None, Some(sent)) => {
                            tracing::info!(
                                "Conversation {} was cleared while its reply was pending",
                                sent
                            );
                            None
                        }
                        (None, None) if returned.is_empty() => {
                            tracing::warn!("Server did not assign a conversation id");
                            None
                        }
                        (None, None) => {
                            *slot = Some(returned.to_string());
                            Some(returned.to_string())
                        }
                    }
                },
            )
            .await
    }

    /// Creates a message, appends it and returns its id.
    pub async fn append_message(&self, content: &str, sender: Sender) -> Result<String> {
        let message = Message::new(content, sender);
        let id = message.id.clone();
        self.append(message).await?;
        Ok(id)
    }

    /// Appends an already-built message.
    pub async fn append(&self, message: Message) -> Result<()> {
        self.storage
            .update(
                StoreScope::Session,
                CHAT_MESSAGES_KEY,
                |messages: &mut Vec<Message>| messages.push(message),
            )
            .await
    }

    /// The stored messages, without the first-run greeting.
    pub async fn stored_messages(&self) -> Vec<Message> {
        self.storage
            .get(StoreScope::Session, CHAT_MESSAGES_KEY)
            .await
    }

    /// The stored messages in insertion order, or a single greeting when there are none.
    pub async fn load_messages(&self) -> Vec<Message> {
        let messages = self.stored_messages().await;
        if messages.is_empty() {
            vec![Message::new(GREETING, Sender::Bot)]
        } else {
            messages
        }
    }

    /// Drops the message list and the active id.
    pub async fn clear(&self) -> Result<()> {
        self.storage
            .remove(StoreScope::Session, CHAT_MESSAGES_KEY)
            .await?;
        self.storage
            .remove(StoreScope::Session, CONVERSATION_ID_KEY)
            .await
    }
}
