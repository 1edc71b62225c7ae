//! System endpoints: liveness and health.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Static liveness payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    status: &'static str,
    message: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /` — Liveness probe.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    summary = "Root",
    description = "Returns a static payload confirming the API is running.",
    responses(
        (status = 200, description = "API is running", body = RootResponse),
    )
)]
pub async fn root_handler() -> impl IntoResponse {
    Json(RootResponse {
        status: "active",
        message: "Movie Recommender API is running",
    })
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current server timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// System routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}
