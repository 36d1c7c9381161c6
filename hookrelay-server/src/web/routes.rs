//! Router construction.

use axum::{
    extract::Request,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::web::authz::require_authorization;
use crate::web::handlers::{
    create_user, create_webhook, get_user, health, ingest_webhook, not_found, AppState,
};

/// Request span carrying only method and path. The query string is left out
/// because inbound webhook calls put their credential there.
fn request_span(request: &Request) -> Span {
    tracing::debug_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// Build the application router.
///
/// Unknown paths and known paths called with the wrong method both answer
/// 404 `{"error": "Not Found"}`.
pub fn router(state: AppState) -> Router {
    let management = Router::new()
        .route("/events", post(create_webhook).fallback(not_found))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_authorization,
        ));

    Router::new()
        .route("/health", get(health).fallback(not_found))
        .route("/events/:id", post(ingest_webhook).fallback(not_found))
        .route("/users", post(create_user).fallback(not_found))
        .route("/users/:user_id", get(get_user).fallback(not_found))
        .merge(management)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}
