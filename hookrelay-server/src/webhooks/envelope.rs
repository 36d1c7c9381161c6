//! Normalized event envelope.
//!
//! Every authenticated inbound call becomes one envelope:
//!
//! ```json
//! {
//!   "name": "<record name>",
//!   "type": "webhook",
//!   "source": "<record id>",
//!   "actions": [
//!     {"type": "<record eventType>", "source": "<record id>", "payload": ..., "metadata": {...}}
//!   ]
//! }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use super::types::{WebhookRecord, RESERVED_FIELDS};
use crate::body::DecodedBody;

/// Envelope-level type of every webhook event.
pub const ENVELOPE_TYPE: &str = "webhook";

/// Normalized representation of one authenticated inbound call.
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub actions: Vec<Action>,
}

/// A single action carried by an envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub payload: DecodedBody,
    pub metadata: Map<String, Value>,
}

/// Wrap a decoded payload and the record's metadata into an envelope.
///
/// The payload is never inspected.
pub fn normalize(record: WebhookRecord, payload: DecodedBody) -> EventEnvelope {
    let mut metadata = record.metadata;
    for reserved in RESERVED_FIELDS {
        metadata.remove(reserved);
    }

    EventEnvelope {
        name: record.name,
        kind: ENVELOPE_TYPE.to_string(),
        source: record.id.clone(),
        actions: vec![Action {
            kind: record.event_type,
            source: record.id,
            payload,
            metadata,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(metadata: Value) -> WebhookRecord {
        WebhookRecord {
            id: "9f1c".to_string(),
            name: "timesheet-test-metadata".to_string(),
            event_type: "timesheet".to_string(),
            secret: "s3cr3t".to_string(),
            metadata: match metadata {
                Value::Object(map) => map,
                _ => Map::new(),
            },
        }
    }

    #[test]
    fn test_normalize_shape() {
        let payload = DecodedBody::Json(json!({"date": "2020-02-10", "hours": "8"}));
        let envelope = normalize(record(json!({"source": "harvest"})), payload);

        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "name": "timesheet-test-metadata",
                "type": "webhook",
                "source": "9f1c",
                "actions": [{
                    "type": "timesheet",
                    "source": "9f1c",
                    "payload": {"date": "2020-02-10", "hours": "8"},
                    "metadata": {"source": "harvest"},
                }],
            })
        );
    }

    #[test]
    fn test_normalize_never_leaks_secret() {
        let envelope = normalize(
            record(json!({"secret": "other", "id": "x", "team": "ops"})),
            DecodedBody::Text("ping".to_string()),
        );

        let json = serde_json::to_string(&envelope).unwrap();
        assert!(!json.contains("s3cr3t"));
        assert_eq!(
            Value::Object(envelope.actions[0].metadata.clone()),
            json!({"team": "ops"})
        );
    }

    #[test]
    fn test_normalize_keeps_payload_opaque() {
        let payload = DecodedBody::Json(json!([1, "two", null]));
        let envelope = normalize(record(json!({})), payload.clone());

        assert_eq!(envelope.actions.len(), 1);
        assert_eq!(envelope.actions[0].payload, payload);
    }
}
