//! RabbitMQ publisher for normalized events.
//!
//! All envelopes go to one durable queue. The broker link is opened on first
//! use and reopened whenever its channel is no longer connected.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use lapin::{
    options::{BasicPublishOptions, QueueDeclareOptions},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties,
};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use super::dispatcher::Dispatcher;
use crate::webhooks::EventEnvelope;

/// An open connection and the channel publishing on it.
struct Link {
    connection: Connection,
    channel: Channel,
}

impl Link {
    async fn open(url: &str, queue: &str) -> Result<Self> {
        info!(queue = %queue, "rabbitmq_publisher_connecting");

        let connection = Connection::connect(url, ConnectionProperties::default())
            .await
            .context("Failed to connect to RabbitMQ")?;
        let channel = connection
            .create_channel()
            .await
            .context("Failed to create channel")?;

        let durable = QueueDeclareOptions {
            durable: true,
            ..Default::default()
        };
        channel
            .queue_declare(queue, durable, FieldTable::default())
            .await
            .context("Failed to declare events queue")?;

        info!(queue = %queue, "rabbitmq_publisher_connected");

        Ok(Self {
            connection,
            channel,
        })
    }
}

/// Publishes envelopes to a RabbitMQ queue. Clones share one broker link.
#[derive(Clone)]
pub struct Publisher {
    url: Arc<str>,
    queue: Arc<str>,
    link: Arc<Mutex<Option<Link>>>,
}

impl Publisher {
    /// Create a publisher for `queue` on the broker at `url`. Nothing is
    /// opened until the first publish.
    pub fn new(url: String, queue: String) -> Self {
        Self {
            url: url.into(),
            queue: queue.into(),
            link: Arc::new(Mutex::new(None)),
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Channel of the current link, reopening the link if it dropped.
    async fn channel(&self) -> Result<Channel> {
        let mut link = self.link.lock().await;

        match link.as_ref() {
            Some(open) if open.channel.status().connected() => Ok(open.channel.clone()),
            _ => {
                let fresh = Link::open(&self.url, &self.queue).await?;
                let channel = fresh.channel.clone();
                *link = Some(fresh);
                Ok(channel)
            }
        }
    }

    /// Publish one envelope as a persistent JSON message.
    pub async fn publish_event(&self, envelope: &EventEnvelope) -> Result<()> {
        let channel = self.channel().await?;

        let body = serde_json::to_vec(envelope).context("Failed to serialize envelope")?;
        let message_id = format!("{}-{}", envelope.source, Uuid::new_v4());
        let properties = BasicProperties::default()
            .with_delivery_mode(2)
            .with_content_type("application/json".into())
            .with_message_id(message_id.clone().into());

        channel
            .basic_publish("", &self.queue, BasicPublishOptions::default(), &body, properties)
            .await
            .context("Failed to publish to events queue")?
            .await
            .context("Failed to confirm publish")?;

        info!(
            queue = %self.queue,
            message_id = %message_id,
            webhook_id = %envelope.source,
            body_length = body.len(),
            "rabbitmq_event_published"
        );

        Ok(())
    }
}

#[async_trait]
impl Dispatcher for Publisher {
    async fn dispatch(&self, envelope: &EventEnvelope) -> Result<()> {
        self.publish_event(envelope).await
    }

    async fn close(&self) {
        let Some(link) = self.link.lock().await.take() else {
            return;
        };

        if let Err(e) = link.channel.close(200, "shutdown").await {
            warn!(error = %e, "rabbitmq_channel_close_error");
        }
        if let Err(e) = link.connection.close(200, "shutdown").await {
            warn!(error = %e, "rabbitmq_connection_close_error");
        }

        info!(queue = %self.queue, "rabbitmq_publisher_closed");
    }
}
