//! Interaction service: appends tracked user events to the log.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{InteractionEvent, InteractionId, InteractionRecord};
use crate::error::GatewayError;
use crate::store::{DocumentStore, INTERACTIONS_PATH};

/// Append-only writer for interaction records.
///
/// Records are never read back, deduplicated, or updated. A client that
/// retries a request after a network failure may create duplicates.
#[derive(Debug, Clone)]
pub struct InteractionService {
    store: Arc<dyn DocumentStore>,
}

impl InteractionService {
    /// Creates a service writing to `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Stamps `event` with the server time and appends it under a new
    /// store-generated key.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] if the append fails.
    pub async fn track(&self, event: InteractionEvent) -> Result<InteractionId, GatewayError> {
        let record = InteractionRecord::new(event, Utc::now());
        let doc =
            serde_json::to_value(&record).map_err(|e| GatewayError::Internal(e.to_string()))?;
        let id = InteractionId::new(self.store.push(INTERACTIONS_PATH, doc).await?);

        tracing::info!(
            %id,
            user_id = %record.event.user_id,
            event_type = %record.event.event_type,
            movie_id = record.event.event_data.movie_id,
            "interaction tracked"
        );
        Ok(id)
    }
}
