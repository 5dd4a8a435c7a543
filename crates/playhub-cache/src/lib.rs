//! # playhub-cache
//!
//! Session ownership records, kept either in process (`moka`) or in Redis.
//! [`RecordCache`] picks the backend named by `[cache] backend`.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod records;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use records::RecordCache;
