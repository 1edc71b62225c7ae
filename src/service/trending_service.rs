//! Trending service: the cache-check-and-refresh path for trending movies.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::domain::TrendingCacheEntry;
use crate::error::GatewayError;
use crate::metadata::MetadataSource;
use crate::store::{DocumentStore, TRENDING_CACHE_PATH};

/// Serves the trending list from the store, refreshing it from the
/// metadata source once it is older than the freshness window.
///
/// # Concurrency
///
/// By default the read-check-write sequence is not guarded: two requests
/// that both see a stale entry will both fetch and both overwrite it, and
/// whichever write lands last wins. With [`TrendingService::with_single_flight`]
/// refreshes inside this process are serialized and the entry is
/// re-checked after the lock is taken, so a burst of stale reads costs one
/// upstream call. Separate processes sharing a store still race.
#[derive(Debug)]
pub struct TrendingService {
    store: Arc<dyn DocumentStore>,
    metadata: Arc<dyn MetadataSource>,
    window: Duration,
    refresh_lock: Option<Mutex<()>>,
}

impl TrendingService {
    /// Creates a service with an unguarded refresh path.
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        metadata: Arc<dyn MetadataSource>,
        window: Duration,
    ) -> Self {
        Self {
            store,
            metadata,
            window,
            refresh_lock: None,
        }
    }

    /// Serializes refreshes within this process.
    #[must_use]
    pub fn with_single_flight(mut self) -> Self {
        self.refresh_lock = Some(Mutex::new(()));
        self
    }

    /// Returns the trending list, refreshing the cache if it is missing or
    /// stale.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Store`] if the cache cannot be read or
    /// written and [`GatewayError::MetadataFetch`] if a needed refresh
    /// fails. A failed fetch leaves the stored entry untouched; a stale
    /// entry is never served as a fallback.
    pub async fn trending_movies(&self) -> Result<Vec<Value>, GatewayError> {
        if let Some(movies) = self.cached_movies(Utc::now()).await? {
            return Ok(movies);
        }

        let Some(lock) = &self.refresh_lock else {
            return self.refresh().await;
        };
        let _guard = lock.lock().await;
        if let Some(movies) = self.cached_movies(Utc::now()).await? {
            tracing::debug!("trending cache refreshed by a concurrent request");
            return Ok(movies);
        }
        self.refresh().await
    }

    /// Fetches a new list and overwrites the cache entry with it.
    ///
    /// # Errors
    ///
    /// Same as [`TrendingService::trending_movies`].
    pub async fn refresh(&self) -> Result<Vec<Value>, GatewayError> {
        let movies = self.metadata.fetch_trending_movies().await?;
        let entry = TrendingCacheEntry::new(movies, Utc::now());
        let doc = serde_json::to_value(&entry).map_err(|e| GatewayError::Internal(e.to_string()))?;
        self.store.set(TRENDING_CACHE_PATH, doc).await?;

        tracing::info!(
            count = entry.movies.len(),
            backend = self.store.backend_name(),
            "trending cache refreshed"
        );
        Ok(entry.movies)
    }

    /// Reads the cache entry and returns its movies if it is fresh at `now`.
    async fn cached_movies(&self, now: DateTime<Utc>) -> Result<Option<Vec<Value>>, GatewayError> {
        let Some(doc) = self.store.get(TRENDING_CACHE_PATH).await? else {
            tracing::debug!("trending cache miss");
            return Ok(None);
        };

        let entry = match TrendingCacheEntry::from_document(doc) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "trending cache entry is malformed; refreshing");
                return Ok(None);
            }
        };

        if entry.is_fresh(now, self.window) {
            tracing::debug!(count = entry.movies.len(), "trending cache hit");
            return Ok(Some(entry.movies));
        }
        match (&entry.timestamp, entry.fetched_at()) {
            (Some(raw), None) => {
                tracing::warn!(timestamp = %raw, "unreadable trending cache timestamp; refreshing");
            }
            _ => tracing::debug!(timestamp = ?entry.timestamp, "trending cache stale"),
        }
        Ok(None)
    }
}
