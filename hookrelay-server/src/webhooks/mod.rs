//! Webhook registration and ingestion.
//!
//! ## Flow
//!
//! ```text
//! POST /events          → Registration → Registry::register → callable URL
//! POST /events/{id}?auth → ingest() → lookup → authenticate → normalize → EventEnvelope
//! ```
//!
//! The envelope is returned to the caller and handed to a
//! [`Dispatcher`](crate::queue::Dispatcher) by the web layer.

pub mod credential;
pub mod envelope;
pub mod ingest;
pub mod registry;
pub mod types;

pub use credential::credential_matches;
pub use envelope::{normalize, Action, EventEnvelope, ENVELOPE_TYPE};
pub use ingest::ingest;
pub use registry::{callable_url, Registry};
pub use types::{RegisteredWebhook, Registration, WebhookRecord, RESERVED_FIELDS};
