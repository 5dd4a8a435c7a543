//! Backend selection for session records.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use playhub_core::config::cache::{CacheBackend, CacheConfig};
use playhub_core::error::AppError;
use playhub_core::result::AppResult;
use playhub_core::traits::SessionRecords;

/// Handle to whichever [`SessionRecords`] backend the config selects.
#[derive(Debug, Clone)]
pub struct RecordCache {
    backend: Arc<dyn SessionRecords>,
}

impl RecordCache {
    /// Opens the configured backend. Redis is connected eagerly so a bad
    /// URL fails startup.
    pub async fn open(config: &CacheConfig) -> AppResult<Self> {
        let backend: Arc<dyn SessionRecords> = match config.backend {
            #[cfg(feature = "memory")]
            CacheBackend::Memory => Arc::new(crate::memory::MemoryRecords::new(
                config.memory_capacity,
                &config.key_prefix,
            )),
            #[cfg(feature = "redis-backend")]
            CacheBackend::Redis => Arc::new(
                crate::redis::RedisRecords::connect(&config.redis_url, &config.key_prefix).await?,
            ),
            #[allow(unreachable_patterns)]
            other => {
                return Err(AppError::configuration(format!(
                    "cache backend '{other}' is not compiled into this build"
                )));
            }
        };
        info!(backend = %config.backend, "Session records ready");
        Ok(Self { backend })
    }

    /// Wraps an existing backend.
    pub fn with_backend(backend: Arc<dyn SessionRecords>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl SessionRecords for RecordCache {
    async fn put(&self, key: &str, holder: &str, ttl: Duration) -> AppResult<()> {
        self.backend.put(key, holder, ttl).await
    }

    async fn holder(&self, key: &str) -> AppResult<Option<String>> {
        self.backend.holder(key).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.backend.remove(key).await
    }

    async fn remove_if_held_by(&self, key: &str, holder: &str) -> AppResult<bool> {
        self.backend.remove_if_held_by(key, holder).await
    }

    async fn ping(&self) -> AppResult<()> {
        self.backend.ping().await
    }
}
