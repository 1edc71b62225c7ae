//! Trending movies endpoint.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /trending-movies` — This week's trending movies.
///
/// # Errors
///
/// Returns [`GatewayError`] if the cache is stale or empty and the TMDB
/// refresh fails, or if the store cannot be reached.
#[utoipa::path(
    get,
    path = "/trending-movies",
    tag = "Movies",
    summary = "Trending movies",
    description = "Returns TMDB's weekly trending movies. The list is cached in the document store and re-fetched once it is older than the cache window. Movie objects are passed through exactly as TMDB returns them.",
    responses(
        (status = 200, description = "Trending movie list", body = Vec<serde_json::Value>),
        (status = 500, description = "TMDB or store failure", body = ErrorResponse),
    )
)]
pub async fn trending_movies(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let movies = state.trending.trending_movies().await?;
    Ok(Json(movies))
}

/// Trending routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/trending-movies", get(trending_movies))
}
