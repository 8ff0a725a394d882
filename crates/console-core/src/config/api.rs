//! REST backend configuration.

use serde::{Deserialize, Serialize};

/// Connection settings for the network-core REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, without a trailing `/api/...` path.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5002".to_string()
}

fn default_timeout() -> u64 {
    30
}
