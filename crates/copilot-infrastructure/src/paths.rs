//! Unified path management for Copilot client files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/copilot/           # Config directory (platform config dir + "copilot")
//! ├── config.toml              # Client configuration
//! ├── storage.json             # Durable key-value store
//! └── logs/                    # Client logs
//!     └── copilot.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "copilot";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for copilot_core::CopilotError {
    fn from(err: PathError) -> Self {
        copilot_core::CopilotError::config(err.to_string())
    }
}

/// Resolves every on-disk location the client uses.
///
/// An explicit base directory overrides the platform default, which is how
/// tests point the client at a temp dir.
#[derive(Debug, Clone)]
pub struct CopilotPaths {
    base_dir: Option<PathBuf>,
}

impl CopilotPaths {
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the client configuration directory (e.g. `~/.config/copilot/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Backing file of the durable store.
    pub fn storage_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("storage.json"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}

impl Default for CopilotPaths {
    fn default() -> Self {
        Self::new(None)
    }
}
