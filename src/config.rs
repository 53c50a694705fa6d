//! Client configuration.
//!
//! The endpoint is an explicit value handed to [`crate::client::ChatClient`]
//! at construction; there is no process-wide base URL.

use serde::{Deserialize, Serialize};

/// Local development backend, the default when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

/// Environment variable the CLI reads to pick a backend.
pub const ENDPOINT_ENV_VAR: &str = "RAGCHAT_ENDPOINT";

/// Connection settings for the chat backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the chat service, without a trailing slash
    pub endpoint: String,
}

impl ClientConfig {
    /// Create a config pointing at the given base URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let mut endpoint = endpoint.into();
        while endpoint.ends_with('/') {
            endpoint.pop();
        }
        Self { endpoint }
    }

    /// Read the endpoint from `RAGCHAT_ENDPOINT`, falling back to the
    /// local development server.
    pub fn from_env() -> Self {
        match std::env::var(ENDPOINT_ENV_VAR) {
            Ok(endpoint) if !endpoint.is_empty() => Self::new(endpoint),
            _ => Self::new(DEFAULT_ENDPOINT),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}
