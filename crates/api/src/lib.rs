//! HTTP API server with observability for the user service.
//!
//! Thin adapter: requests become commands/queries on the buses, bus results
//! become the `{status, message, data}` JSON envelope. Structured logging
//! (tracing) and Prometheus metrics come along for free.

pub mod config;
pub mod error;
pub mod response;
pub mod routes;

use std::sync::Arc;

use application::{
    CreateUserCommandHandler, CreateUserService, GetUserQueryHandler, GetUserService,
    InMemoryEmailService, SendUserConfirmationEmail,
};
use axum::Router;
use axum::routing::{get, post};
use bus::{BusError, CommandBus, EventBus, QueryBus};
use domain::{InMemoryUserRepository, UserCreated};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::users::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/api/v1/users", post(routes::users::create))
        .route("/api/v1/users/{id}", get(routes::users::get))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the default application state: in-memory repository and email
/// transport, event subscribers, and the command/query buses.
///
/// Bus misconfiguration (duplicate handler) surfaces here, at startup,
/// before any traffic is served.
pub fn create_default_state()
-> Result<(Arc<AppState>, Arc<InMemoryUserRepository>, Arc<InMemoryEmailService>), BusError> {
    let repo = Arc::new(InMemoryUserRepository::new());
    let emails = Arc::new(InMemoryEmailService::new());

    let event_bus = EventBus::builder()
        .subscribe::<UserCreated, _>(SendUserConfirmationEmail::new(emails.clone()))
        .build();

    let command_bus = CommandBus::builder()
        .register(CreateUserCommandHandler::new(CreateUserService::new(
            repo.clone(),
            event_bus,
        )))?
        .build();

    let query_bus = QueryBus::builder()
        .register(GetUserQueryHandler::new(GetUserService::new(repo.clone())))?
        .build();

    let state = Arc::new(AppState {
        command_bus,
        query_bus,
    });

    Ok((state, repo, emails))
}
