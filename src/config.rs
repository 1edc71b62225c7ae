//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Only `TMDB_API_KEY` is mandatory;
//! everything else falls back to a default suitable for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Duration;

/// Default TMDB v3 API base URL.
pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Default Firebase Realtime Database endpoint.
pub const DEFAULT_FIREBASE_DATABASE_URL: &str =
    "https://movie-recommender-f0ad3-default-rtdb.firebaseio.com";

/// Default freshness window of the trending cache (one day).
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;

/// Origins allowed by CORS when `CORS_ORIGINS` is not set.
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost", "http://localhost:3000"];

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is not set (or is empty).
    #[error("{0} not found in environment variables; set it in the environment or a .env file")]
    MissingVar(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value as found in the environment.
        value: String,
    },
}

/// Which document store backs the cache and the interaction log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Firebase Realtime Database over its REST API.
    Firebase,
    /// Process-local store; contents are lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firebase" | "rtdb" => Ok(Self::Firebase),
            "memory" | "in-memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`AppConfig::from_env`].
#[derive(Clone)]
pub struct AppConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// Bearer credential for the TMDB API.
    pub tmdb_api_key: String,

    /// TMDB base URL, without a trailing slash.
    pub tmdb_base_url: String,

    /// Store implementation to use.
    pub store_backend: StoreBackend,

    /// Firebase Realtime Database URL.
    pub firebase_database_url: String,

    /// Path to the Firebase service-account key file.
    pub firebase_credentials: PathBuf,

    /// Origins allowed to make cross-origin requests.
    pub cors_origins: Vec<String>,

    /// How long a cached trending list stays fresh (`CACHE_TTL_SECS`).
    pub cache_window: Duration,

    /// Serialize trending refreshes within this process.
    pub trending_single_flight: bool,

    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("listen_addr", &self.listen_addr)
            .field("tmdb_api_key", &"<redacted>")
            .field("tmdb_base_url", &self.tmdb_base_url)
            .field("store_backend", &self.store_backend)
            .field("firebase_database_url", &self.firebase_database_url)
            .field("firebase_credentials", &self.firebase_credentials)
            .field("cors_origins", &self.cors_origins)
            .field("cache_window", &self.cache_window)
            .field("trending_single_flight", &self.trending_single_flight)
            .field("log_json", &self.log_json)
            .finish()
    }
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv().ok()` first to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] if `TMDB_API_KEY` is absent and
    /// [`ConfigError::InvalidValue`] if a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tmdb_api_key = lookup("TMDB_API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingVar("TMDB_API_KEY"))?;

        let listen_addr: SocketAddr =
            parse_var(&lookup, "LISTEN_ADDR", "0.0.0.0:8000".parse().ok())?;
        let store_backend = parse_var(&lookup, "STORE_BACKEND", Some(StoreBackend::Firebase))?;
        let cache_ttl_secs = parse_var(&lookup, "CACHE_TTL_SECS", Some(DEFAULT_CACHE_TTL_SECS))?;
        let cache_window = i64::try_from(cache_ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "CACHE_TTL_SECS",
                value: cache_ttl_secs.to_string(),
            })?;
        let trending_single_flight = parse_bool(&lookup, "TRENDING_SINGLE_FLIGHT", false)?;

        let tmdb_base_url = lookup("TMDB_BASE_URL")
            .unwrap_or_else(|| DEFAULT_TMDB_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let firebase_database_url = lookup("FIREBASE_DATABASE_URL")
            .unwrap_or_else(|| DEFAULT_FIREBASE_DATABASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let firebase_credentials = lookup("FIREBASE_CREDENTIALS")
            .map_or_else(|| PathBuf::from("serviceAccountKey.json"), PathBuf::from);

        let cors_origins = lookup("CORS_ORIGINS").map_or_else(
            || DEFAULT_CORS_ORIGINS.iter().map(ToString::to_string).collect(),
            |raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_string)
                    .collect()
            },
        );

        let log_json = lookup("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json"));

        Ok(Self {
            listen_addr,
            tmdb_api_key,
            tmdb_base_url,
            store_backend,
            firebase_database_url,
            firebase_credentials,
            cors_origins,
            cache_window,
            trending_single_flight,
            log_json,
        })
    }
}

/// Parses `key` as `T`, returning `default` when the variable is missing.
fn parse_var<F, T>(lookup: &F, key: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
        None => default.ok_or(ConfigError::MissingVar(key)),
    }
}

/// Parses a boolean variable. Accepts `true`/`1`/`yes` and `false`/`0`/`no`
/// (case-insensitive).
fn parse_bool<F>(lookup: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidValue { key, value: raw }),
        },
    }
}
