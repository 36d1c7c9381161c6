//! Webhook registry: mints, stores and looks up webhook records.

use std::sync::Arc;

use tracing::info;
use url::Url;
use uuid::Uuid;

use super::types::{RegisteredWebhook, Registration, WebhookRecord};
use crate::error::ServiceError;
use crate::store::{RecordStore, StoreError};

/// Owns the webhook records in one table of the record store.
#[derive(Clone)]
pub struct Registry {
    store: Arc<dyn RecordStore>,
    table: String,
}

impl Registry {
    pub fn new(store: Arc<dyn RecordStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    /// Register a new webhook.
    ///
    /// Mints a fresh id and secret, writes the record once and returns it
    /// together with the callable URL under `origin`. Collisions are not
    /// checked; a v4 UUID clash is treated as impossible.
    pub async fn register(
        &self,
        registration: Registration,
        origin: &Url,
    ) -> Result<RegisteredWebhook, ServiceError> {
        let record = WebhookRecord {
            id: Uuid::new_v4().to_string(),
            name: registration.name,
            event_type: registration.event_type,
            secret: Uuid::new_v4().to_string(),
            metadata: registration.metadata,
        };

        let url = callable_url(origin, &record.id, &record.secret)
            .ok_or(ServiceError::Internal("Could not create webhook"))?;

        let value = serde_json::to_value(&record)
            .map_err(StoreError::from)
            .map_err(ServiceError::storage("Could not create webhook"))?;

        self.store
            .put(&self.table, &record.id, value)
            .await
            .map_err(ServiceError::storage("Could not create webhook"))?;

        info!(
            webhook_id = %record.id,
            name = %record.name,
            event_type = %record.event_type,
            metadata_fields = record.metadata.len(),
            "webhook_registered"
        );

        Ok(RegisteredWebhook {
            id: record.id,
            secret: record.secret,
            name: record.name,
            event_type: record.event_type,
            url: url.to_string(),
            metadata: record.metadata,
        })
    }

    /// Look up a webhook record by id. A missing record is `Ok(None)`.
    pub async fn lookup(&self, id: &str) -> Result<Option<WebhookRecord>, StoreError> {
        match self.store.get(&self.table, id).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}

/// Build `<origin>/events/{id}?auth={secret}`.
///
/// Any path on `origin` is kept as a prefix. Returns `None` for origins that
/// cannot carry a path, such as `mailto:` URLs.
pub fn callable_url(origin: &Url, id: &str, secret: &str) -> Option<Url> {
    let mut url = origin.clone();
    url.set_fragment(None);
    url.set_query(None);

    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .push("events")
        .push(id);

    url.query_pairs_mut().append_pair("auth", secret);

    Some(url)
}
