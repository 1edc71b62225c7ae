//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use chrono::Duration;

use crate::metadata::MetadataSource;
use crate::service::{InteractionService, TrendingService};
use crate::store::DocumentStore;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Trending-movies cache.
    pub trending: Arc<TrendingService>,
    /// Interaction log.
    pub interactions: Arc<InteractionService>,
}

impl AppState {
    /// Wires both services onto one shared store.
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        metadata: Arc<dyn MetadataSource>,
        cache_window: Duration,
        single_flight: bool,
    ) -> Self {
        let trending = TrendingService::new(Arc::clone(&store), metadata, cache_window);
        let trending = if single_flight {
            trending.with_single_flight()
        } else {
            trending
        };
        Self {
            trending: Arc::new(trending),
            interactions: Arc::new(InteractionService::new(store)),
        }
    }
}
