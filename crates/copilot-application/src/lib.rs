//! Application layer for the Copilot client.
//!
//! Coordinates conversation state, the history index and the backend gateway
//! behind a single [`InteractionController`].

pub mod controller;
pub mod conversation_state;
pub mod history_index;

pub use controller::{Command, CommandOutcome, Control, InteractionController, Listing};
pub use conversation_state::ConversationState;
pub use history_index::HistoryIndex;

use copilot_core::config::ClientConfig;
use copilot_core::gateway::BackendGateway;
use copilot_infrastructure::StorageAdapter;
use std::sync::Arc;

/// Builds a controller whose state and history share one storage adapter.
pub fn build_controller(
    storage: StorageAdapter,
    gateway: Arc<dyn BackendGateway>,
    config: ClientConfig,
) -> InteractionController {
    InteractionController::new(
        ConversationState::new(storage.clone()),
        HistoryIndex::new(storage),
        gateway,
        config,
    )
}
