//! HTTP endpoint handlers.
//!
//! Handlers decode the body, call into the registry, ingestion or users
//! modules, and render the result. Envelope dispatch is spawned so the
//! response never waits on the broker.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{
        header::{CONTENT_TYPE, HOST},
        HeaderMap, StatusCode,
    },
    Json,
};
use serde::Serialize;
use tracing::{error, info};
use url::Url;

use crate::body::DecodedBody;
use crate::error::{ErrorResponse, ServiceError};
use crate::queue::Dispatcher;
use crate::store::RecordStore;
use crate::users::{UserDirectory, UserRecord};
use crate::web::authz::{AllowAll, AuthorizationHook};
use crate::webhooks::{ingest, EventEnvelope, RegisteredWebhook, Registration, Registry};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Registry,
    pub users: UserDirectory,
    pub dispatcher: Arc<dyn Dispatcher>,
    pub authorization: Arc<dyn AuthorizationHook>,
}

impl AppState {
    /// Build state over one record store. Webhook management is open to
    /// everyone until [`AppState::with_authorization`] installs a hook.
    pub fn new(config: Config, store: Arc<dyn RecordStore>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        let registry = Registry::new(Arc::clone(&store), config.events_table.clone());
        let users = UserDirectory::new(store, config.users_table.clone());

        Self {
            config: Arc::new(config),
            registry,
            users,
            dispatcher,
            authorization: Arc::new(AllowAll),
        }
    }

    pub fn with_authorization(mut self, hook: Arc<dyn AuthorizationHook>) -> Self {
        self.authorization = hook;
        self
    }
}

fn decode_body(headers: &HeaderMap, body: Bytes) -> Result<DecodedBody, ServiceError> {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    Ok(DecodedBody::decode(content_type, body)?)
}

/// Origin used for callable URLs: the configured public base URL, else the
/// request's `Host` (and `X-Forwarded-Proto`), else localhost.
fn request_origin(config: &Config, headers: &HeaderMap) -> Option<Url> {
    if let Some(base) = &config.public_base_url {
        return Some(base.clone());
    }

    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| v == "http" || v == "https")
        .unwrap_or_else(|| "http".to_string());

    headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.trim().is_empty())
        .and_then(|host| Url::parse(&format!("{}://{}", proto, host.trim())).ok())
        .or_else(|| Url::parse(&format!("http://localhost:{}", config.port)).ok())
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Webhooks
// =============================================================================

/// Register a webhook.
///
/// Body fields `name` and `eventType` are required; everything else is kept
/// as metadata. The response carries the callable URL.
pub async fn create_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RegisteredWebhook>, ServiceError> {
    let body = decode_body(&headers, body)?;
    let registration = Registration::from_body(&body)?;

    let origin = request_origin(&state.config, &headers)
        .ok_or(ServiceError::Internal("Could not create webhook"))?;

    let created = state.registry.register(registration, &origin).await?;

    Ok(Json(created))
}

/// Read the `auth` credential from a raw query string.
///
/// When the parameter is repeated, the first occurrence is used.
pub fn credential_from_query(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == "auth")
        .map(|(_, value)| value.into_owned())
}

/// Receive an inbound webhook call.
///
/// On success the normalized envelope is returned and handed to the
/// dispatcher in the background.
pub async fn ingest_webhook(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<EventEnvelope>, ServiceError> {
    let credential = credential_from_query(query.as_deref());

    info!(
        webhook_id = %id,
        has_credential = credential.is_some(),
        body_length = body.len(),
        "webhook_call_received"
    );

    let payload = decode_body(&headers, body)?;
    let envelope = ingest(&state.registry, &id, credential.as_deref(), payload).await?;

    let dispatcher = Arc::clone(&state.dispatcher);
    let outbound = envelope.clone();
    tokio::spawn(async move {
        if let Err(e) = dispatcher.dispatch(&outbound).await {
            error!(source = %outbound.source, error = %e, "event_dispatch_failed");
        }
    });

    Ok(Json(envelope))
}

// =============================================================================
// Users
// =============================================================================

/// Create (or replace) a user.
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UserRecord>, ServiceError> {
    let body = decode_body(&headers, body)?;
    let fields = body.as_object().cloned().unwrap_or_default();
    let user = UserRecord::from_fields(&fields)?;

    Ok(Json(state.users.create(user).await?))
}

/// Fetch a user by id.
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserRecord>, ServiceError> {
    Ok(Json(state.users.get(&user_id).await?))
}

// =============================================================================
// Fallback
// =============================================================================

/// Response for any route that does not exist.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not Found")))
}
