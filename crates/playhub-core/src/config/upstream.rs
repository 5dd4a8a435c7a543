//! Outbound API bridge configuration.

use serde::{Deserialize, Serialize};

/// Settings for the sealed HTTP bridge to the platform backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL every API path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Value of the `apiKey` request header.
    #[serde(default)]
    pub api_key: String,
    /// PEM-encoded RSA public key of the backend (SPKI or PKCS#1). Request
    /// bodies are encrypted to it. Empty disables the bridge.
    #[serde(default)]
    pub public_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            public_key: String::new(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_timeout() -> u64 {
    3
}
