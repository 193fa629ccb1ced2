//! Single-flight tracking per input control.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// A user-facing control that can have at most one request outstanding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Control {
    /// The chat input box and its send button.
    MessageInput,
    /// The upload button.
    FileUpload,
    /// An entry in the backend file listing.
    ListedFile(String),
    /// An entry in the list of files uploaded this session.
    UploadedFile(String),
    FileListing,
    ConversationListing,
}

/// Set of controls currently in the `sending` state.
#[derive(Clone, Default)]
pub struct InFlight {
    controls: Arc<Mutex<HashSet<Control>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `control` to `sending`. Returns `None` if it already is.
    pub fn begin(&self, control: Control) -> Option<FlightGuard> {
        let mut controls = self
            .controls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !controls.insert(control.clone()) {
            return None;
        }
        Some(FlightGuard {
            controls: self.controls.clone(),
            control,
        })
    }

    pub fn is_busy(&self, control: &Control) -> bool {
        self.controls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(control)
    }
}

/// Returns its control to `idle` when dropped.
pub struct FlightGuard {
    controls: Arc<Mutex<HashSet<Control>>>,
    control: Control,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.controls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(&self.control);
    }
}
