//! Webhook record types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::body::DecodedBody;
use crate::error::ServiceError;

/// Record fields that never travel as caller metadata.
pub const RESERVED_FIELDS: [&str; 4] = ["id", "name", "eventType", "secret"];

/// A registered webhook as persisted in the events table.
///
/// Records are written once at registration and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRecord {
    /// Random v4 UUID, primary key
    pub id: String,
    /// Display label
    pub name: String,
    /// Free-form category tag, becomes the action type of every event
    pub event_type: String,
    /// Random v4 UUID, the only credential for inbound calls
    pub secret: String,
    /// Caller-supplied extension fields
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// A validated registration request.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub name: String,
    pub event_type: String,
    pub metadata: Map<String, Value>,
}

impl Registration {
    /// Validate a request object.
    ///
    /// `name` and `eventType` are required strings (checked in that order).
    /// Every other field becomes metadata, except reserved record fields,
    /// which are dropped.
    pub fn from_fields(mut fields: Map<String, Value>) -> Result<Self, ServiceError> {
        let name = required_string(&mut fields, "name")?;
        let event_type = required_string(&mut fields, "eventType")?;

        for reserved in RESERVED_FIELDS {
            fields.remove(reserved);
        }

        Ok(Self {
            name,
            event_type,
            metadata: fields,
        })
    }

    /// Validate a decoded request body. Bodies that are not objects are
    /// treated as an empty object.
    pub fn from_body(body: &DecodedBody) -> Result<Self, ServiceError> {
        let fields = body.as_object().cloned().unwrap_or_default();
        Self::from_fields(fields)
    }
}

fn required_string(fields: &mut Map<String, Value>, key: &'static str) -> Result<String, ServiceError> {
    match fields.remove(key) {
        Some(Value::String(s)) if s.is_empty() => Err(ServiceError::EmptyField(key)),
        Some(Value::String(s)) => Ok(s),
        _ => Err(ServiceError::Validation(key)),
    }
}

/// Response returned from a successful registration.
///
/// `url` already embeds the secret, so it is the only thing the third party
/// needs.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredWebhook {
    #[serde(rename = "uuid")]
    pub id: String,
    #[serde(rename = "authString")]
    pub secret: String,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub url: String,
    pub metadata: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_registration_splits_metadata() {
        let registration = Registration::from_fields(fields(json!({
            "name": "timesheet-test-metadata",
            "eventType": "timesheet",
            "source": "harvest",
        })))
        .unwrap();

        assert_eq!(registration.name, "timesheet-test-metadata");
        assert_eq!(registration.event_type, "timesheet");
        assert_eq!(Value::Object(registration.metadata), json!({"source": "harvest"}));
    }

    #[test]
    fn test_registration_missing_name() {
        let err = Registration::from_fields(fields(json!({"eventType": "timesheet"}))).unwrap_err();
        assert!(matches!(err, ServiceError::Validation("name")));
    }

    #[test]
    fn test_registration_numeric_event_type() {
        let err = Registration::from_fields(fields(json!({"name": "n", "eventType": 5}))).unwrap_err();
        assert!(matches!(err, ServiceError::Validation("eventType")));
    }

    #[test]
    fn test_registration_checks_name_first() {
        let err = Registration::from_fields(Map::new()).unwrap_err();
        assert!(matches!(err, ServiceError::Validation("name")));
    }

    #[test]
    fn test_registration_empty_name() {
        let err = Registration::from_fields(fields(json!({"name": "", "eventType": "t"}))).unwrap_err();
        assert!(matches!(err, ServiceError::EmptyField("name")));
    }

    #[test]
    fn test_registration_drops_reserved_fields() {
        let registration = Registration::from_fields(fields(json!({
            "name": "n",
            "eventType": "t",
            "id": "chosen-by-caller",
            "secret": "chosen-by-caller",
            "team": "billing",
        })))
        .unwrap();

        assert_eq!(Value::Object(registration.metadata), json!({"team": "billing"}));
    }

    #[test]
    fn test_registration_from_non_object_body() {
        let body = DecodedBody::Text("name=n".to_string());
        let err = Registration::from_body(&body).unwrap_err();
        assert!(matches!(err, ServiceError::Validation("name")));
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = WebhookRecord {
            id: "id-1".to_string(),
            name: "n".to_string(),
            event_type: "t".to_string(),
            secret: "s".to_string(),
            metadata: Map::new(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["eventType"], "t");
        assert!(value.get("event_type").is_none());
    }

    #[test]
    fn test_registered_webhook_wire_names() {
        let registered = RegisteredWebhook {
            id: "id-1".to_string(),
            secret: "s".to_string(),
            name: "n".to_string(),
            event_type: "t".to_string(),
            url: "http://localhost/events/id-1?auth=s".to_string(),
            metadata: Map::new(),
        };

        let value = serde_json::to_value(&registered).unwrap();
        assert_eq!(value["uuid"], "id-1");
        assert_eq!(value["authString"], "s");
        assert_eq!(value["type"], "t");
    }
}
