//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//!
//! - Rejected request bodies respond with the violation list itself as a
//!   JSON array. The status is picked by precedence: any deserialization
//!   violation gives 400, else any content-type violation gives 415, else
//!   422.
//! - Every other error uses the [`ErrorBody`] envelope.
//! - Internal errors (including schema misconfiguration) are logged and
//!   replaced by a generic message; their details never reach the client.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use bouncer_core::{ViolationKind, Violations};
use bouncer_schema::{BouncerError, SchemaError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content type declared on every error response.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Structured JSON error response body for non-validation errors.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// The request body failed validation (400, 415, or 422).
    #[error("request rejected: {0}")]
    Rejected(Violations),

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Pick the response status for a non-empty violation list.
pub fn rejection_status(violations: &Violations) -> StatusCode {
    if violations.has(ViolationKind::Deserialization) {
        StatusCode::BAD_REQUEST
    } else if violations.has(ViolationKind::ContentType) {
        StatusCode::UNSUPPORTED_MEDIA_TYPE
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Rejected(violations) => (rejection_status(violations), "VALIDATION_ERROR"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let content_type = [(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))];

        match self {
            Self::Rejected(violations) => (status, content_type, Json(violations)).into_response(),
            other => {
                // Never expose internal error messages to clients.
                let message = match &other {
                    Self::Internal(_) => {
                        tracing::error!(error = %other, "internal server error");
                        "An internal error occurred".to_string()
                    }
                    _ => other.to_string(),
                };
                let body = ErrorBody {
                    error: ErrorDetail {
                        code: code.to_string(),
                        message,
                    },
                };
                (status, content_type, Json(body)).into_response()
            }
        }
    }
}

impl From<Violations> for AppError {
    fn from(violations: Violations) -> Self {
        Self::Rejected(violations)
    }
}

/// Fatal validation failures are server-side problems.
impl From<BouncerError> for AppError {
    fn from(err: BouncerError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        Self::Internal(format!("schema configuration error: {err}"))
    }
}
