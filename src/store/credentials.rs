//! Service-account authentication for Firebase Realtime Database.
//!
//! A Google service-account key file is exchanged for a short-lived OAuth2
//! access token: we sign an RS256 JWT assertion with the account's private
//! key and post it to the account's `token_uri`. Tokens are cached and
//! re-minted shortly before they expire.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use super::{StoreError, StoreResult};

/// OAuth2 scopes needed to read and write Realtime Database data.
pub const FIREBASE_SCOPES: &str =
    "https://www.googleapis.com/auth/userinfo.email https://www.googleapis.com/auth/firebase.database";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const EXPIRY_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The subset of a service-account key file we need.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Account e-mail, used as issuer and subject of the assertion.
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    /// Key identifier, sent as the JWT `kid` header when present.
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// Google project the account belongs to.
    #[serde(default)]
    pub project_id: Option<String>,
    /// OAuth2 token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Parses a key from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Credentials`] if the JSON is malformed or a
    /// required field is missing.
    pub fn from_json(raw: &str) -> StoreResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| StoreError::Credentials(format!("invalid service account key: {e}")))
    }

    /// Reads and parses a key file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Credentials`] if the file cannot be read or
    /// parsed.
    pub fn from_file(path: &Path) -> StoreResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Credentials(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    /// Builds a signed JWT assertion valid from `now` for one hour.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Credentials`] if the private key is not a
    /// valid RSA PEM key.
    pub fn assertion(&self, now: DateTime<Utc>) -> StoreResult<String> {
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| StoreError::Credentials(format!("invalid private key: {e}")))?;
        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.private_key_id);

        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            sub: &self.client_email,
            aud: &self.token_uri,
            scope: FIREBASE_SCOPES,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&header, &claims, &key)
            .map_err(|e| StoreError::Credentials(format!("cannot sign assertion: {e}")))
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    aud: &'a str,
    scope: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// An access token together with its expiry.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Bearer token value.
    pub value: String,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Whether the token is still usable at `now`, keeping a safety margin
    /// before the real expiry.
    #[must_use]
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Mints and caches access tokens for one service account.
#[derive(Debug)]
pub struct TokenSource {
    key: ServiceAccountKey,
    client: reqwest::Client,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenSource {
    /// Creates a token source for `key`.
    #[must_use]
    pub fn new(key: ServiceAccountKey) -> Arc<Self> {
        Arc::new(Self {
            key,
            client: reqwest::Client::new(),
            cached: Mutex::new(None),
        })
    }

    /// Returns a valid access token, minting a new one if the cached token
    /// is missing or about to expire.
    ///
    /// Concurrent callers wait on the same mint instead of each posting
    /// their own assertion.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Credentials`] if signing or the token
    /// exchange fails.
    pub async fn access_token(&self) -> StoreResult<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_usable_at(Utc::now())) {
            return Ok(token.value.clone());
        }
        let token = self.mint().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn mint(&self) -> StoreResult<AccessToken> {
        let now = Utc::now();
        let assertion = self.key.assertion(now)?;
        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| StoreError::Credentials(format!("token request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Credentials(format!(
                "token endpoint returned {status}: {body}"
            )));
        }
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Credentials(format!("token response: {e}")))?;

        tracing::debug!(client_email = %self.key.client_email, "minted firebase access token");
        Ok(AccessToken {
            value: body.access_token,
            expires_at: token_expiry(now, body.expires_in),
        })
    }
}

/// Expiry of a token minted at `now`. An absent, negative, or
/// unrepresentable `expires_in` falls back to the assertion lifetime.
fn token_expiry(now: DateTime<Utc>, expires_in: Option<i64>) -> DateTime<Utc> {
    let fallback = Duration::seconds(ASSERTION_LIFETIME_SECS);
    let lifetime = expires_in
        .filter(|secs| *secs >= 0)
        .and_then(Duration::try_seconds)
        .unwrap_or(fallback);
    now.checked_add_signed(lifetime)
        .unwrap_or_else(|| now + fallback)
}
