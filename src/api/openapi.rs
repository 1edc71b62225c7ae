//! OpenAPI document for the REST API.

use utoipa::OpenApi;

use crate::api::dto::TrackResponse;
use crate::api::handlers::{interactions, system, trending};
use crate::domain::{EventData, InteractionEvent, InteractionId};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification, served at `/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Movie Recommender API",
        description = "Backend API for the Movie Recommender application"
    ),
    paths(
        system::root_handler,
        system::health_handler,
        trending::trending_movies,
        interactions::track_interaction,
    ),
    components(schemas(
        system::RootResponse,
        system::HealthResponse,
        InteractionEvent,
        EventData,
        InteractionId,
        TrackResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "System", description = "Liveness and health"),
        (name = "Movies", description = "Cached TMDB listings"),
        (name = "Interactions", description = "User interaction log"),
    )
)]
pub struct ApiDoc;
