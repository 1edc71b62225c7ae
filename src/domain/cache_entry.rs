//! The singleton trending-movies cache document.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Last fetched trending list and when it was fetched.
///
/// Stored at [`crate::store::TRENDING_CACHE_PATH`] as
/// `{"movies": [...], "timestamp": "<ISO-8601>"}` and overwritten in
/// place on every refresh. The timestamp stays a raw string so documents
/// written by other clients, or with no timestamp at all, still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingCacheEntry {
    /// Movie records exactly as TMDB returned them.
    #[serde(default)]
    pub movies: Vec<Value>,
    /// Fetch time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl TrendingCacheEntry {
    /// Creates an entry for a list fetched at `fetched_at`.
    #[must_use]
    pub fn new(movies: Vec<Value>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            movies,
            timestamp: Some(fetched_at.to_rfc3339()),
        }
    }

    /// Decodes a stored document.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the document does not have the
    /// cache-entry shape (for example `movies` is not an array).
    pub fn from_document(doc: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(doc)
    }

    /// Parsed fetch time, if the timestamp is present and readable.
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }

    /// Whether the entry is younger than `window` at `now`.
    ///
    /// A missing or unreadable timestamp is never fresh.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.fetched_at()
            .is_some_and(|fetched| now.signed_duration_since(fetched) < window)
    }
}

/// Parses an ISO-8601 timestamp. RFC 3339 with an offset is preferred;
/// a naive `YYYY-MM-DDTHH:MM:SS[.fff]` value is read as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day() -> Duration {
        Duration::hours(24)
    }

    #[test]
    fn new_entry_is_fresh_immediately() {
        let now = Utc::now();
        let entry = TrendingCacheEntry::new(vec![json!({"id": 1})], now);
        assert!(entry.is_fresh(now, day()));
        assert_eq!(entry.fetched_at().map(|t| t.timestamp()), Some(now.timestamp()));
    }

    #[test]
    fn entry_goes_stale_at_window_boundary() {
        let fetched = Utc::now();
        let entry = TrendingCacheEntry::new(vec![], fetched);
        assert!(entry.is_fresh(fetched + Duration::hours(23), day()));
        assert!(!entry.is_fresh(fetched + day(), day()));
        assert!(!entry.is_fresh(fetched + Duration::hours(25), day()));
    }

    #[test]
    fn missing_timestamp_is_stale() {
        let Ok(entry) = TrendingCacheEntry::from_document(json!({"movies": [{"id": 1}]})) else {
            panic!("document should decode");
        };
        assert!(entry.timestamp.is_none());
        assert!(!entry.is_fresh(Utc::now(), day()));
    }

    #[test]
    fn garbage_timestamp_is_stale() {
        let Ok(entry) =
            TrendingCacheEntry::from_document(json!({"movies": [], "timestamp": "yesterday"}))
        else {
            panic!("document should decode");
        };
        assert!(entry.fetched_at().is_none());
        assert!(!entry.is_fresh(Utc::now(), day()));
    }

    #[test]
    fn naive_iso_timestamp_is_read_as_utc() {
        let Some(parsed) = parse_timestamp("2024-11-02T10:15:30.123456") else {
            panic!("naive timestamp should parse");
        };
        assert_eq!(parsed.to_rfc3339(), "2024-11-02T10:15:30.123456+00:00");
    }

    #[test]
    fn offset_timestamp_is_normalized_to_utc() {
        let Some(parsed) = parse_timestamp("2024-11-02T12:00:00+02:00") else {
            panic!("rfc3339 timestamp should parse");
        };
        assert_eq!(parsed.to_rfc3339(), "2024-11-02T10:00:00+00:00");
    }

    #[test]
    fn wrong_shape_fails_to_decode() {
        let result = TrendingCacheEntry::from_document(json!({"movies": "none"}));
        assert!(result.is_err());
    }

    #[test]
    fn serialized_shape_matches_store_layout() {
        let Some(at) = parse_timestamp("2025-01-01T00:00:00Z") else {
            panic!("timestamp should parse");
        };
        let entry = TrendingCacheEntry::new(vec![json!({"id": 7, "title": "Dune"})], at);
        let Ok(doc) = serde_json::to_value(&entry) else {
            panic!("serialization failed");
        };
        assert_eq!(
            doc,
            json!({
                "movies": [{"id": 7, "title": "Dune"}],
                "timestamp": "2025-01-01T00:00:00+00:00"
            })
        );
    }
}
