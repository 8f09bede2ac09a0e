//! User creation and lookup endpoints.

use std::sync::Arc;

use application::{CreateUserCommand, GetUserQuery};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use bus::{CommandBus, QueryBus};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::response;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub command_bus: CommandBus,
    pub query_bus: QueryBus,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// POST /api/v1/users — create a user.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    let command = CreateUserCommand {
        email: req.email,
        password: req.password,
        name: req.name,
    };

    state.command_bus.dispatch(command).await?;

    Ok(response::success(
        Value::Null,
        "User created successfully",
        StatusCode::CREATED,
    ))
}

/// GET /api/v1/users/:id — look a user up by id.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let user = state.query_bus.ask(GetUserQuery { id }).await?;

    match user {
        Some(user) => Ok(response::success(
            serde_json::to_value(user.to_dto())?,
            "User retrieved successfully",
            StatusCode::OK,
        )),
        None => Err(ApiError::NotFound("User not found".to_string())),
    }
}
