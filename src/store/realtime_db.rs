//! Firebase Realtime Database backend.
//!
//! Uses the database REST API: every path maps to `{base}/{path}.json`.
//! `GET` reads (a missing node reads as `null`), `PUT` overwrites, and
//! `POST` appends a child under a server-generated push key, returned as
//! `{"name": "<key>"}`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use super::credentials::TokenSource;
use super::{DocumentStore, StoreError, StoreResult, path_segments};

/// Realtime Database REST client.
#[derive(Debug, Clone)]
pub struct RealtimeDatabase {
    base_url: String,
    client: reqwest::Client,
    tokens: Option<Arc<TokenSource>>,
}

#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

impl RealtimeDatabase {
    /// Creates a client for the database at `base_url`.
    ///
    /// With `tokens` set, every request carries an OAuth2 bearer token;
    /// without it requests are unauthenticated (local emulator, tests).
    #[must_use]
    pub fn new(base_url: &str, tokens: Option<Arc<TokenSource>>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            tokens,
        }
    }

    fn url(&self, path: &str) -> StoreResult<String> {
        let segments = path_segments(path)?;
        Ok(format!("{}/{}.json", self.base_url, segments.join("/")))
    }

    async fn authorize(&self, request: RequestBuilder) -> StoreResult<RequestBuilder> {
        match &self.tokens {
            Some(tokens) => Ok(request.bearer_auth(tokens.access_token().await?)),
            None => Ok(request),
        }
    }

    async fn execute(&self, request: RequestBuilder) -> StoreResult<Response> {
        let response = self
            .authorize(request)
            .await?
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), %body, "realtime database request failed");
        Err(StoreError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl DocumentStore for RealtimeDatabase {
    fn backend_name(&self) -> &'static str {
        "firebase-rtdb"
    }

    async fn get(&self, path: &str) -> StoreResult<Option<Value>> {
        let url = self.url(path)?;
        let response = self.execute(self.client.get(url)).await?;
        let value: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok((!value.is_null()).then_some(value))
    }

    async fn set(&self, path: &str, value: Value) -> StoreResult<()> {
        let url = self.url(path)?;
        // `print=silent` skips echoing the written document back.
        let request = self
            .client
            .put(url)
            .query(&[("print", "silent")])
            .json(&value);
        self.execute(request).await?;
        Ok(())
    }

    async fn push(&self, path: &str, value: Value) -> StoreResult<String> {
        let url = self.url(path)?;
        let response = self.execute(self.client.post(url).json(&value)).await?;
        let body: PushResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(body.name)
    }

    async fn ping(&self) -> StoreResult<()> {
        let url = self.url("")?;
        self.execute(self.client.get(url).query(&[("shallow", "true")]))
            .await?;
        Ok(())
    }
}
