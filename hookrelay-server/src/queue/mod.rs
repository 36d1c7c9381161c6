//! Event dispatch.
//!
//! Normalized envelopes leave the service through a [`Dispatcher`]:
//! - [`Publisher`]: RabbitMQ, one persistent message per envelope
//! - [`LogDispatcher`]: logs the envelope, for runs without a broker
//!
//! ## Architecture
//!
//! ```text
//! Third party → POST /events/{id} → ingest → Dispatcher → webhook_events queue
//! ```
//!
//! Dispatch is fire-and-forget from the request's point of view. Durability
//! and retries belong to the broker.

pub mod dispatcher;
pub mod publisher;

pub use dispatcher::{Dispatcher, LogDispatcher};
pub use publisher::Publisher;
