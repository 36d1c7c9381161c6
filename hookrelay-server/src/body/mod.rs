//! Inbound request body decoding.
//!
//! The web layer turns every inbound body into a [`DecodedBody`] based on its
//! declared `Content-Type` before any webhook logic runs. Downstream code
//! treats the decoded value as opaque.
//!
//! ```text
//! Content-Type                         → variant
//! application/json, */*+json           → Json
//! application/xml, text/xml, */*+xml   → Markup (XML converted to JSON)
//! application/x-www-form-urlencoded    → Json (object of strings)
//! text/*                               → Text
//! anything else / missing              → Bytes (empty → Json {})
//! ```

pub mod xml;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while decoding a body that claims a structured content type.
#[derive(Error, Debug)]
pub enum BodyError {
    #[error("Invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid XML body: {0}")]
    Xml(String),

    #[error("Invalid form body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
}

/// A request body decoded according to its content type.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    /// Structured JSON (also used for form-encoded bodies)
    Json(Value),
    /// XML document converted to a JSON structure
    Markup(Value),
    /// UTF-8 text
    Text(String),
    /// Anything else, kept as-is
    Bytes(Bytes),
}

impl DecodedBody {
    /// Decode `body` according to the given `Content-Type` header value.
    pub fn decode(content_type: Option<&str>, body: Bytes) -> Result<Self, BodyError> {
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|m| m.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if mime == "application/json" || mime.ends_with("+json") {
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok(DecodedBody::Json(Value::Object(Map::new())));
            }
            return Ok(DecodedBody::Json(serde_json::from_slice(&body)?));
        }

        if mime == "application/xml" || mime == "text/xml" || mime.ends_with("+xml") {
            let text = std::str::from_utf8(&body).map_err(|e| BodyError::Xml(e.to_string()))?;
            return Ok(DecodedBody::Markup(xml::to_json(text)?));
        }

        if mime == "application/x-www-form-urlencoded" {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&body)?;
            let object = pairs
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect::<Map<String, Value>>();
            return Ok(DecodedBody::Json(Value::Object(object)));
        }

        if mime.starts_with("text/") {
            return Ok(match String::from_utf8(body.to_vec()) {
                Ok(text) => DecodedBody::Text(text),
                Err(_) => DecodedBody::Bytes(body),
            });
        }

        if body.is_empty() {
            return Ok(DecodedBody::Json(Value::Object(Map::new())));
        }

        Ok(DecodedBody::Bytes(body))
    }

    /// The body as a JSON object, if it decoded to one.
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            DecodedBody::Json(Value::Object(map)) | DecodedBody::Markup(Value::Object(map)) => {
                Some(map)
            }
            _ => None,
        }
    }

    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodedBody::Json(_) => "json",
            DecodedBody::Markup(_) => "markup",
            DecodedBody::Text(_) => "text",
            DecodedBody::Bytes(_) => "bytes",
        }
    }
}

/// Structured variants serialize as their JSON value, text as a string and raw
/// bytes as a base64 string.
impl Serialize for DecodedBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DecodedBody::Json(value) | DecodedBody::Markup(value) => value.serialize(serializer),
            DecodedBody::Text(text) => serializer.serialize_str(text),
            DecodedBody::Bytes(bytes) => serializer.serialize_str(&BASE64.encode(bytes)),
        }
    }
}
