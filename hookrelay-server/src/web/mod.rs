//! Web server module.
//!
//! ```text
//! GET  /health               → health
//! POST /events               → register a webhook (behind the authorization hook)
//! POST /events/{id}?auth=... → inbound webhook call
//! POST /users                → create a user
//! GET  /users/{userId}       → fetch a user
//! *                          → 404 {"error": "Not Found"}
//! ```

pub mod authz;
pub mod handlers;
pub mod routes;

pub use authz::{require_authorization, AllowAll, AuthorizationHook};
pub use handlers::{
    create_user, create_webhook, get_user, health, ingest_webhook, not_found, AppState,
    credential_from_query, HealthResponse,
};
pub use routes::router;
