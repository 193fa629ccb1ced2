//! Client configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_DEPLOYED_BASE_URL: &str = "https://coding-copilot.onrender.com";
pub const DEFAULT_MODEL: &str = "groq";
pub const DEFAULT_CHAT_TASK: &str = "general";
pub const DEFAULT_UPLOAD_TASK: &str = "summarize";

/// Hosts treated as a local development setup.
const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1"];

/// Root of `config.toml`. Every field has a default so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Host the client considers itself running on. Decides the endpoint.
    pub host: String,
    pub local_base_url: String,
    pub deployed_base_url: String,
    pub request_timeout_secs: u64,
    pub default_model: String,
    /// Task sent along with plain chat messages.
    pub chat_task: String,
    /// Task sent with uploaded files.
    pub upload_task: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            local_base_url: DEFAULT_LOCAL_BASE_URL.to_string(),
            deployed_base_url: DEFAULT_DEPLOYED_BASE_URL.to_string(),
            request_timeout_secs: 120,
            default_model: DEFAULT_MODEL.to_string(),
            chat_task: DEFAULT_CHAT_TASK.to_string(),
            upload_task: DEFAULT_UPLOAD_TASK.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn is_local_host(&self) -> bool {
        LOCAL_HOSTS.contains(&self.host.trim().to_ascii_lowercase().as_str())
    }

    /// Local endpoint when running on a development host, deployed endpoint otherwise.
    pub fn base_url(&self) -> &str {
        if self.is_local_host() {
            self.local_base_url.trim_end_matches('/')
        } else {
            self.deployed_base_url.trim_end_matches('/')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolves_local_endpoint() {
        let config = ClientConfig::default();
        assert!(config.is_local_host());
        assert_eq!(config.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_remote_host_resolves_deployed_endpoint() {
        let config = ClientConfig {
            host: "copilot.example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), DEFAULT_DEPLOYED_BASE_URL);
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = ClientConfig {
            local_base_url: "http://127.0.0.1:9000/".to_string(),
            host: "127.0.0.1".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ClientConfig = toml::from_str("host = \"example.org\"").unwrap();
        assert_eq!(config.host, "example.org");
        assert_eq!(config.default_model, DEFAULT_MODEL);
        assert_eq!(config.upload_task, DEFAULT_UPLOAD_TASK);
    }
}
