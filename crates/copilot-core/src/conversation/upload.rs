use std::path::Path;
use std::sync::Arc;

/// A file picked by the user for upload.
///
/// Only lives in memory for the duration of the client session; the bytes are
/// shared so the same file can be re-submitted when the user asks about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Arc<Vec<u8>>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::new(bytes),
        }
    }

    /// Reads a file from disk, naming it after the final path component.
    pub async fn from_path(path: &Path) -> crate::error::Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                crate::error::CopilotError::io(format!("Not a file path: {}", path.display()))
            })?;
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::new(name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
