//! Key-value record store.
//!
//! Records are JSON values addressed by `(table, key)`. Two backends exist:
//! - [`MemoryStore`]: process-local map, used for tests and local runs
//! - [`RedisStore`]: Redis, with keys namespaced as `"{table}:{key}"`
//!
//! The store is the only place cross-request state lives. Neither backend adds
//! caching or locking beyond what a single `get`/`put` needs.

pub mod memory;
pub mod redis;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Errors raised by a record store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Key-value semantics required by the registry and the users resource.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read a record. A missing key is `Ok(None)`, never an error.
    async fn get(&self, table: &str, key: &str) -> Result<Option<Value>, StoreError>;

    /// Write a record, replacing any previous value under the same key.
    async fn put(&self, table: &str, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Build the namespaced key for table isolation.
pub(crate) fn namespaced_key(table: &str, key: &str) -> String {
    format!("{}:{}", table, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_key() {
        assert_eq!(namespaced_key("events", "abc"), "events:abc");
        assert_eq!(namespaced_key("users", "u:1"), "users:u:1");
    }
}
