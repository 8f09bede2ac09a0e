//! Standard JSON envelope for all responses.
//!
//! Success: `{"status": "success", "message": ..., "data": ...}`
//! Error:   `{"status": "error", "message": ...}`

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

/// Builds a success response with the standardized envelope.
pub fn success(data: Value, message: &str, status: StatusCode) -> Response {
    let payload = json!({
        "status": "success",
        "message": message,
        "data": data,
    });
    (status, Json(payload)).into_response()
}

/// Builds an error response with the standardized envelope.
pub fn error(message: &str, status: StatusCode) -> Response {
    let payload = json!({
        "status": "error",
        "message": message,
    });
    (status, Json(payload)).into_response()
}
