//! Interaction tracking endpoint.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::TrackResponse;
use crate::app_state::AppState;
use crate::domain::InteractionEvent;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /track` — Record a user interaction.
///
/// Every body rejection (missing content type, unparseable JSON, missing
/// or mistyped field) is answered with 422 and nothing is stored.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if the body is rejected and
/// [`GatewayError::Store`] if the record cannot be appended.
#[utoipa::path(
    post,
    path = "/track",
    tag = "Interactions",
    summary = "Track an interaction",
    description = "Appends a user interaction event to the interaction log under a server-generated id and stamps it with the server time.",
    request_body = InteractionEvent,
    responses(
        (status = 200, description = "Interaction recorded", body = TrackResponse),
        (status = 422, description = "Body does not match the interaction shape", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn track_interaction(
    State(state): State<AppState>,
    payload: Result<Json<InteractionEvent>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    let Json(event) = payload.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let id = state.interactions.track(event).await?;
    Ok(Json(TrackResponse::success(id)))
}

/// Interaction routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/track", post(track_interaction))
}
