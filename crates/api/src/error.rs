//! API error type with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bus::BusError;
use domain::DomainError;

use crate::response;

/// The caller receives this instead of internal error detail.
const OPAQUE_MESSAGE: &str = "Internal server error";

/// API-level error that maps to an HTTP response in the standard envelope.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// A bus dispatch failed (handler error or misconfiguration).
    Bus(BusError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Bus(err) => bus_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, OPAQUE_MESSAGE.to_string())
            }
        };

        response::error(&message, status)
    }
}

fn bus_error_to_response(err: BusError) -> (StatusCode, String) {
    match err {
        // domain conditions surface to the client with their own message
        BusError::Handler(DomainError::Validation(e)) => {
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        BusError::Handler(DomainError::Conflict(msg)) => (StatusCode::BAD_REQUEST, msg),
        // everything else is a server fault: log the detail, answer opaquely
        BusError::Handler(err) => {
            tracing::error!(error = %err, "handler failed");
            (StatusCode::INTERNAL_SERVER_ERROR, OPAQUE_MESSAGE.to_string())
        }
        BusError::NoHandlerFound { .. } | BusError::DuplicateHandler { .. } => {
            tracing::error!(error = %err, "bus misconfiguration");
            (StatusCode::INTERNAL_SERVER_ERROR, OPAQUE_MESSAGE.to_string())
        }
    }
}

impl From<BusError> for ApiError {
    fn from(err: BusError) -> Self {
        ApiError::Bus(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}
