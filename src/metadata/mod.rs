//! External movie metadata sources.
//!
//! [`MetadataSource`] is the seam between the trending cache and the
//! third-party API. [`TmdbClient`] is the production implementation.

pub mod tmdb;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GatewayError;

pub use tmdb::TmdbClient;

/// Something that can list this week's trending movies.
///
/// Movie records are opaque JSON objects and are passed through verbatim.
#[async_trait]
pub trait MetadataSource: Send + Sync + std::fmt::Debug {
    /// Fetches the current trending list.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MetadataFetch`] on any transport, status, or
    /// decoding failure. Failures are not retried.
    async fn fetch_trending_movies(&self) -> Result<Vec<Value>, GatewayError>;
}
