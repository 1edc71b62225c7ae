//! REST API layer: route handlers, DTOs, OpenAPI, and router composition.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;
use axum::http::HeaderValue;
use axum::http::header::InvalidHeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints and the API
/// documentation routes.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(handlers::routes())
        .merge(docs_router())
}

#[cfg(feature = "swagger-ui")]
fn docs_router() -> Router<AppState> {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/openapi.json", openapi::ApiDoc::openapi()))
}

#[cfg(not(feature = "swagger-ui"))]
fn docs_router() -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;
    use utoipa::OpenApi;

    Router::new().route(
        "/openapi.json",
        get(|| async { Json(openapi::ApiDoc::openapi()) }),
    )
}

/// CORS policy for the given origin allow-list.
///
/// Credentials are allowed, so methods and headers are mirrored from the
/// preflight request instead of answered with a wildcard.
///
/// # Errors
///
/// Returns [`InvalidHeaderValue`] if an origin is not a valid header value.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}
