//! Redis-backed record store.
//!
//! Values are stored as JSON strings under `"{table}:{key}"`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde_json::Value;
use tracing::{debug, info};

use super::{namespaced_key, RecordStore, StoreError};

/// Record store using a managed (auto-reconnecting) Redis connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis at the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        info!(url_length = url.len(), "redis_connecting");

        let client = redis::Client::open(url).context("Invalid Redis URL")?;
        let conn = client
            .get_connection_manager()
            .await
            .context("Failed to connect to Redis")?;

        info!("redis_connected");

        Ok(Self { conn })
    }
}

#[async_trait]
impl RecordStore for RedisStore {
    async fn get(&self, table: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let namespaced = namespaced_key(table, key);
        debug!(key = %namespaced, "redis_get");

        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(&namespaced).await?;

        match raw {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, table: &str, key: &str, value: Value) -> Result<(), StoreError> {
        let namespaced = namespaced_key(table, key);
        debug!(key = %namespaced, "redis_set");

        let body = serde_json::to_string(&value)?;
        let mut conn = self.conn.clone();
        let _: () = conn.set(&namespaced, body).await?;

        Ok(())
    }
}
