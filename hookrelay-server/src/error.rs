//! User-facing error taxonomy.
//!
//! Every failure path of the HTTP surface ends in a [`ServiceError`], which
//! renders as a status code plus `{"error": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::body::BodyError;
use crate::store::StoreError;

/// Message returned for both an unknown webhook and a bad credential.
pub const WEBHOOK_NOT_FOUND: &str = "Webhook not found";

/// Errors surfaced to HTTP callers.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A required field is missing or not a string.
    #[error("\"{0}\" must be a string")]
    Validation(&'static str),

    /// A required string field is empty.
    #[error("\"{0}\" must not be empty")]
    EmptyField(&'static str),

    /// The body did not match its declared content type.
    #[error("Malformed request body")]
    MalformedBody(#[from] BodyError),

    /// No webhook record exists for the id.
    #[error("webhook not found")]
    NotFound,

    /// The supplied credential does not match the record's secret.
    #[error("webhook credential mismatch")]
    AuthFailure,

    /// No user record exists for the id.
    #[error("Could not find user with provided \"userId\"")]
    UserNotFound,

    /// The authorization hook rejected the request.
    #[error("Unauthorized")]
    Unauthorized,

    /// The record store failed. `message` is what the caller sees.
    #[error("{message}")]
    Storage {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    /// A failure that is not the caller's fault and has no store cause.
    #[error("{0}")]
    Internal(&'static str),
}

impl ServiceError {
    pub fn storage(message: &'static str) -> impl FnOnce(StoreError) -> ServiceError {
        move |source| ServiceError::Storage { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_)
            | ServiceError::EmptyField(_)
            | ServiceError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound | ServiceError::AuthFailure | ServiceError::UserNotFound => {
                StatusCode::NOT_FOUND
            }
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Storage { .. } | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The message placed in the response body.
    ///
    /// Unknown ids and bad credentials share one message so callers cannot
    /// tell which ids exist.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::NotFound | ServiceError::AuthFailure => WEBHOOK_NOT_FOUND.to_string(),
            other => other.to_string(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match &self {
            ServiceError::Storage { message, source } => {
                error!(error = %source, message = %message, "record_store_failed");
            }
            ServiceError::MalformedBody(e) => {
                warn!(error = %e, "request_body_malformed");
            }
            ServiceError::Internal(message) => {
                error!(message = %message, "internal_error");
            }
            _ => {}
        }

        (self.status(), Json(ErrorResponse::new(self.public_message()))).into_response()
    }
}
