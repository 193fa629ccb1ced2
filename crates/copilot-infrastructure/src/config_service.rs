//! Configuration service implementation.
//!
//! Loads the client configuration from `config.toml` (by default
//! `~/.config/copilot/config.toml`).

use crate::paths::CopilotPaths;
use copilot_core::config::ClientConfig;
use copilot_core::error::{CopilotError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Reads and writes [`ClientConfig`].
///
/// A missing file is not an error: the defaults are used. A file that exists
/// but does not parse is reported as `CopilotError::Config` so a typo does
/// not silently point the client at the wrong backend.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Uses the standard config location.
    pub fn new(paths: &CopilotPaths) -> Result<Self> {
        Ok(Self {
            path: paths.config_file()?,
        })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<ClientConfig> {
        if !self.path.exists() {
            tracing::debug!("No config at {:?}, using defaults", self.path);
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            CopilotError::config(format!(
                "Failed to parse configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
