//! Session-record backend selection.

use serde::{Deserialize, Serialize};

/// Where session ownership records live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-process map; lost on restart.
    #[default]
    Memory,
    /// Shared Redis instance.
    Redis,
}

impl std::fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Redis => f.write_str("redis"),
        }
    }
}

/// The `[cache]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    /// Used when `backend = "redis"`.
    #[serde(default = "default_redis_url")]
    pub redis_url: String,
    /// Prepended to every record key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Record limit for the memory backend.
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            redis_url: default_redis_url(),
            key_prefix: default_key_prefix(),
            memory_capacity: default_memory_capacity(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "playhub:".to_string()
}

fn default_memory_capacity() -> u64 {
    100_000
}
