//! User interaction events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Event-specific payload. Only the movie reference is modeled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventData {
    /// TMDB movie id the event refers to.
    pub movie_id: i64,
}

/// A user interaction as submitted by a client.
///
/// Only the shape is checked: any `event_type` string is accepted and
/// `timestamp` is stored exactly as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InteractionEvent {
    /// Identifier of the acting user.
    pub user_id: String,
    /// Free-form event tag (e.g. `"click"`, `"watch"`).
    pub event_type: String,
    /// Event payload.
    pub event_data: EventData,
    /// Client-side time of the event.
    pub timestamp: String,
}

/// An interaction as persisted in the log: the submitted event plus the
/// server-side creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Submitted event fields, stored flat alongside `created_at`.
    #[serde(flatten)]
    pub event: InteractionEvent,
    /// When the server accepted the event.
    pub created_at: DateTime<Utc>,
}

impl InteractionRecord {
    /// Stamps `event` with `created_at`.
    #[must_use]
    pub fn new(event: InteractionEvent, created_at: DateTime<Utc>) -> Self {
        Self { event, created_at }
    }
}
