//! Durable user → connection ownership, the arbiter of reconnect races.

pub mod cache_store;
pub mod memory_store;
pub mod store;

pub use cache_store::CacheSessionStore;
pub use memory_store::MemorySessionStore;
pub use store::SessionStore;
