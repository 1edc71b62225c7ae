//! TMDB v3 API client.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::Value;

use super::MetadataSource;
use crate::error::GatewayError;

/// Longest upstream error body echoed back to callers.
const MAX_ERROR_BODY: usize = 512;

/// Paged TMDB list response. Only `results` is consumed; absent and
/// `null` both read as an empty list.
#[derive(Debug, Deserialize)]
struct TrendingPage {
    #[serde(default)]
    results: Option<Vec<Value>>,
}

/// Authenticated client for `GET /trending/movie/week`.
#[derive(Clone)]
pub struct TmdbClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TmdbClient {
    /// Creates a client for the API at `base_url` using `api_key` as the
    /// bearer credential. Transport defaults apply; no timeout override.
    #[must_use]
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// URL of the weekly trending-movies endpoint.
    #[must_use]
    pub fn trending_url(&self) -> String {
        format!("{}/trending/movie/week", self.base_url)
    }
}

#[async_trait]
impl MetadataSource for TmdbClient {
    async fn fetch_trending_movies(&self) -> Result<Vec<Value>, GatewayError> {
        let url = self.trending_url();
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| GatewayError::MetadataFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(GatewayError::MetadataFetch(format!(
                "{status} for url ({url}): {body}"
            )));
        }

        let page: TrendingPage = response
            .json()
            .await
            .map_err(|e| GatewayError::MetadataFetch(e.to_string()))?;

        let movies = page.results.unwrap_or_default();
        tracing::debug!(count = movies.len(), "fetched trending movies from TMDB");
        Ok(movies)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn trending_url_trims_trailing_slash() {
        let client = TmdbClient::new("https://api.themoviedb.org/3/", "key");
        assert_eq!(
            client.trending_url(),
            "https://api.themoviedb.org/3/trending/movie/week"
        );
    }

    #[test]
    fn debug_does_not_leak_key() {
        let client = TmdbClient::new("https://api.themoviedb.org/3", "very-secret");
        assert!(!format!("{client:?}").contains("very-secret"));
    }

    #[test]
    fn missing_or_null_results_decode_as_empty() {
        for raw in [r#"{"page": 1}"#, r#"{"page": 1, "results": null}"#] {
            let Ok(page) = serde_json::from_str::<TrendingPage>(raw) else {
                panic!("{raw} should decode");
            };
            assert!(page.results.unwrap_or_default().is_empty());
        }
    }
}
