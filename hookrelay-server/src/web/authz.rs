//! Authorization hook for webhook management routes.
//!
//! Registration is guarded by an [`AuthorizationHook`]. The default,
//! [`AllowAll`], lets every request through; deployments that need protection
//! install their own hook via [`AppState::with_authorization`].
//!
//! Inbound webhook calls are not subject to this hook; they authenticate with
//! their per-webhook credential instead.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::error::ServiceError;
use crate::web::AppState;

/// Decides whether a management request may proceed.
pub trait AuthorizationHook: Send + Sync {
    fn authorize(&self, method: &Method, path: &str, headers: &HeaderMap) -> bool;
}

/// Hook that allows every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AuthorizationHook for AllowAll {
    fn authorize(&self, _method: &Method, _path: &str, _headers: &HeaderMap) -> bool {
        true
    }
}

/// Middleware consulting the installed hook.
pub async fn require_authorization(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let allowed = state
        .authorization
        .authorize(request.method(), request.uri().path(), request.headers());

    if !allowed {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "management_request_denied"
        );
        return ServiceError::Unauthorized.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all() {
        assert!(AllowAll.authorize(&Method::POST, "/events", &HeaderMap::new()));
        assert!(AllowAll.authorize(&Method::GET, "/events", &HeaderMap::new()));
    }
}
