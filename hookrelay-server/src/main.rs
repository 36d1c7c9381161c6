//! HookRelay Web Server.
//!
//! This binary:
//! - Registers webhooks and hands out their callable URLs
//! - Authenticates inbound webhook calls against the record store
//! - Publishes normalized events to RabbitMQ (or logs them when no broker is configured)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hookrelay::{
    router, AppState, Config, Dispatcher, LogDispatcher, MemoryStore, Publisher, RecordStore,
    RedisStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        users_table = %config.users_table,
        events_table = %config.events_table,
        store_configured = config.store_url.is_some(),
        broker_configured = config.cloudamqp_url.is_some(),
        events_queue = %config.events_queue,
        public_base_url = ?config.public_base_url.as_ref().map(|u| u.as_str()),
        "config_loaded"
    );

    let store: Arc<dyn RecordStore> = match &config.store_url {
        Some(url) => Arc::new(RedisStore::connect(url).await?),
        None => {
            warn!("record_store_in_memory");
            Arc::new(MemoryStore::new())
        }
    };

    let dispatcher: Arc<dyn Dispatcher> = match &config.cloudamqp_url {
        Some(url) => {
            info!(queue = %config.events_queue, "rabbitmq_publisher_created");
            Arc::new(Publisher::new(url.clone(), config.events_queue.clone()))
        }
        None => {
            warn!("event_dispatch_log_only");
            Arc::new(LogDispatcher)
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = AppState::new(config, store, Arc::clone(&dispatcher));
    let app = router(state);

    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    dispatcher.close().await;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
