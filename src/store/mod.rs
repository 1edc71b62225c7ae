//! Document store: a JSON tree addressed by slash-separated paths.
//!
//! The trending cache and the interaction log both live in one shared
//! store. [`DocumentStore`] exposes the three operations they need:
//! whole-document reads, full overwrites, and appends under a
//! store-generated key. There are no transactions and no compare-and-swap.
//!
//! Two backends exist: [`RealtimeDatabase`] talks to Firebase Realtime
//! Database over REST, [`InMemoryStore`] keeps the tree in process memory.

pub mod credentials;
pub mod memory;
pub mod realtime_db;

use async_trait::async_trait;
use serde_json::Value;

pub use credentials::{ServiceAccountKey, TokenSource};
pub use memory::InMemoryStore;
pub use realtime_db::RealtimeDatabase;

/// Path of the singleton trending-movies cache document.
pub const TRENDING_CACHE_PATH: &str = "cache/trending_movies";

/// Collection under which interaction records are appended.
pub const INTERACTIONS_PATH: &str = "interactions";

/// Errors raised by a [`DocumentStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The path contains an empty or forbidden segment.
    #[error("invalid path {0:?}")]
    InvalidPath(String),

    /// Service-account credentials could not be loaded or exchanged.
    #[error("credentials: {0}")]
    Credentials(String),

    /// The request never produced a response.
    #[error("transport: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The backend answered with a body that could not be decoded.
    #[error("decode: {0}")]
    Decode(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A hierarchical JSON document store.
///
/// Implementations are shared across request tasks behind an `Arc`.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// Reads the document at `path`, or `None` if nothing is stored there.
    async fn get(&self, path: &str) -> StoreResult<Option<Value>>;

    /// Replaces the document at `path` with `value`. Writing `null`
    /// deletes it.
    async fn set(&self, path: &str, value: Value) -> StoreResult<()>;

    /// Appends `value` under a new child of `path` and returns the
    /// generated child key.
    async fn push(&self, path: &str, value: Value) -> StoreResult<String>;

    /// Checks that the backend is reachable and the credentials work.
    async fn ping(&self) -> StoreResult<()> {
        self.get("").await.map(|_| ())
    }
}

/// Splits `path` into its segments, ignoring leading, trailing, and
/// repeated slashes. The empty path addresses the root.
///
/// # Errors
///
/// Returns [`StoreError::InvalidPath`] if a segment contains one of the
/// characters Realtime Database forbids in keys (`. # $ [ ]`).
pub fn path_segments(path: &str) -> StoreResult<Vec<&str>> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments
        .iter()
        .any(|s| s.contains(['.', '#', '$', '[', ']']))
    {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn segments_ignore_redundant_slashes() {
        let Ok(segments) = path_segments("/cache//trending_movies/") else {
            panic!("valid path");
        };
        assert_eq!(segments, vec!["cache", "trending_movies"]);
    }

    #[test]
    fn empty_path_is_root() {
        let Ok(segments) = path_segments("") else {
            panic!("valid path");
        };
        assert!(segments.is_empty());
    }

    #[test]
    fn forbidden_characters_are_rejected() {
        for bad in ["a.b", "cache/#1", "$root", "x/[0]"] {
            assert!(
                matches!(path_segments(bad), Err(StoreError::InvalidPath(_))),
                "{bad} should be rejected"
            );
        }
    }
}
