//! Dispatcher seam between ingestion and the outside world.

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::webhooks::EventEnvelope;

/// Receives every normalized envelope.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Deliver one envelope.
    async fn dispatch(&self, envelope: &EventEnvelope) -> Result<()>;

    /// Release any held connections.
    async fn close(&self) {}
}

/// Dispatcher that only logs envelopes.
#[derive(Debug, Clone, Default)]
pub struct LogDispatcher;

#[async_trait]
impl Dispatcher for LogDispatcher {
    async fn dispatch(&self, envelope: &EventEnvelope) -> Result<()> {
        info!(
            source = %envelope.source,
            name = %envelope.name,
            actions = envelope.actions.len(),
            "event_dispatch_logged"
        );
        Ok(())
    }
}
