//! Inbound webhook ingestion.
//!
//! One pass, no retries:
//! 1. Look up the record by id
//! 2. Authenticate the supplied credential against the record's secret
//! 3. Normalize the payload into an [`EventEnvelope`]
//!
//! Handing the envelope to a dispatcher is the caller's job.

use tracing::{info, warn};

use super::credential::credential_matches;
use super::envelope::{normalize, EventEnvelope};
use super::registry::Registry;
use crate::body::DecodedBody;
use crate::error::ServiceError;

/// Authenticate an inbound call and normalize its payload.
///
/// Unknown ids yield [`ServiceError::NotFound`] and bad or missing credentials
/// yield [`ServiceError::AuthFailure`]; both render identically to callers.
/// The credential itself is never logged.
pub async fn ingest(
    registry: &Registry,
    id: &str,
    credential: Option<&str>,
    payload: DecodedBody,
) -> Result<EventEnvelope, ServiceError> {
    let record = registry
        .lookup(id)
        .await
        .map_err(ServiceError::storage("Could not process webhook"))?;

    let record = match record {
        Some(record) => record,
        None => {
            warn!(webhook_id = %id, reason = "unknown_id", "webhook_ingest_rejected");
            return Err(ServiceError::NotFound);
        }
    };

    if !credential_matches(&record.secret, credential) {
        warn!(
            webhook_id = %id,
            reason = "credential_mismatch",
            has_credential = credential.is_some(),
            "webhook_ingest_rejected"
        );
        return Err(ServiceError::AuthFailure);
    }

    let payload_kind = payload.kind();
    let envelope = normalize(record, payload);

    info!(
        webhook_id = %envelope.source,
        name = %envelope.name,
        event_type = %envelope.actions[0].kind,
        payload_kind = payload_kind,
        "webhook_ingested"
    );

    Ok(envelope)
}
