//! Process-local records on a `moka` cache.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};

use playhub_core::result::AppResult;
use playhub_core::traits::SessionRecords;

#[derive(Debug, Clone)]
struct Record {
    holder: String,
    ttl: Duration,
}

/// Each record lives for the TTL it was last written with.
struct WrittenTtl;

impl Expiry<String, Record> for WrittenTtl {
    fn expire_after_create(&self, _key: &String, record: &Record, _now: Instant) -> Option<Duration> {
        Some(record.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        record: &Record,
        _now: Instant,
        _remaining: Option<Duration>,
    ) -> Option<Duration> {
        Some(record.ttl)
    }
}

/// Records held in this process only. Suitable for a single node.
#[derive(Debug, Clone)]
pub struct MemoryRecords {
    records: Cache<String, Record>,
    key_prefix: String,
}

impl MemoryRecords {
    /// Holds at most `capacity` records.
    pub fn new(capacity: u64, key_prefix: &str) -> Self {
        Self {
            records: Cache::builder()
                .max_capacity(capacity)
                .expire_after(WrittenTtl)
                .build(),
            key_prefix: key_prefix.to_string(),
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }
}

#[async_trait]
impl SessionRecords for MemoryRecords {
    async fn put(&self, key: &str, holder: &str, ttl: Duration) -> AppResult<()> {
        let record = Record {
            holder: holder.to_string(),
            ttl,
        };
        self.records.insert(self.full_key(key), record).await;
        Ok(())
    }

    async fn holder(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self
            .records
            .get(&self.full_key(key))
            .await
            .map(|record| record.holder))
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.records.invalidate(&self.full_key(key)).await;
        Ok(())
    }

    async fn remove_if_held_by(&self, key: &str, holder: &str) -> AppResult<bool> {
        let outcome = self
            .records
            .entry(self.full_key(key))
            .and_compute_with(|current| {
                let op = match current {
                    Some(entry) if entry.value().holder == holder => Op::Remove,
                    _ => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;
        Ok(matches!(outcome, CompResult::Removed(_)))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
