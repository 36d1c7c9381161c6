//! HookRelay - webhook registration and ingestion service.
//!
//! Third parties call a per-webhook secret URL; each authenticated call is
//! normalized into an event envelope and handed to a dispatcher.
//!
//! ## Architecture
//!
//! ```text
//! POST /events       → Registry → record store
//! POST /events/{id}  → ingest (lookup → authenticate → normalize) → Dispatcher → queue
//! ```
//!
//! The binary `hookrelay-web` wires these together from environment
//! configuration.

pub mod body;
pub mod config;
pub mod error;
pub mod queue;
pub mod store;
pub mod users;
pub mod web;
pub mod webhooks;

// Re-export commonly used types
pub use body::DecodedBody;
pub use config::Config;
pub use error::ServiceError;
pub use queue::{Dispatcher, LogDispatcher, Publisher};
pub use store::{MemoryStore, RecordStore, RedisStore, StoreError};
pub use web::{router, AppState};
pub use webhooks::{ingest, EventEnvelope, Registry, WebhookRecord};
