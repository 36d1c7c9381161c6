//! In-process record store backed by a `HashMap`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{namespaced_key, RecordStore, StoreError};

/// Record store that keeps everything in memory.
///
/// Cloning shares the underlying map, so every handle sees every write.
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records across all tables.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, table: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let records = self.records.read().await;
        Ok(records.get(&namespaced_key(table, key)).cloned())
    }

    async fn put(&self, table: &str, key: &str, value: Value) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(namespaced_key(table, key), value);
        Ok(())
    }
}
