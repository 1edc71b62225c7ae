//! Interaction-tracking DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::InteractionId;

/// Response body for `POST /track`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TrackResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// Key of the stored interaction record.
    pub id: InteractionId,
}

impl TrackResponse {
    /// Success envelope for a stored interaction.
    #[must_use]
    pub fn success(id: InteractionId) -> Self {
        Self {
            status: "success",
            id,
        }
    }
}
