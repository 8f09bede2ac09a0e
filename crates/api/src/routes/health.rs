//! Liveness endpoint.
//!
//! Deliberately outside the `{status, message, data}` envelope so probes
//! can match the bare `{"status":"ok"}` body.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health — liveness probe for the user service.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
