//! movie-recommender-api server entry point.
//!
//! Loads configuration, connects the document store, and starts the Axum
//! HTTP server.

use std::sync::Arc;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use movie_recommender_api::api;
use movie_recommender_api::app_state::AppState;
use movie_recommender_api::config::{AppConfig, StoreBackend};
use movie_recommender_api::metadata::TmdbClient;
use movie_recommender_api::store::{
    DocumentStore, InMemoryStore, RealtimeDatabase, ServiceAccountKey, TokenSource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration; a missing TMDB_API_KEY stops startup here
    let config = AppConfig::from_env().context("loading configuration")?;
    init_tracing(config.log_json);
    tracing::info!(addr = %config.listen_addr, "starting movie-recommender-api");

    // Connect the document store
    let store = connect_store(&config).await?;

    // Build application state
    let metadata = Arc::new(TmdbClient::new(&config.tmdb_base_url, &config.tmdb_api_key));
    let app_state = AppState::new(
        store,
        metadata,
        config.cache_window,
        config.trending_single_flight,
    );

    // Build router
    let cors = api::cors_layer(&config.cors_origins).context("parsing CORS_ORIGINS")?;
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match config.store_backend {
        StoreBackend::Firebase => {
            let key = ServiceAccountKey::from_file(&config.firebase_credentials)
                .context("loading Firebase service account")?;
            let db = RealtimeDatabase::new(
                &config.firebase_database_url,
                Some(TokenSource::new(key)),
            );
            db.ping()
                .await
                .context("connecting to Firebase Realtime Database")?;
            tracing::info!(url = %config.firebase_database_url, "connected to Firebase Realtime Database");
            Ok(Arc::new(db))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; cache and interactions are lost on restart");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}
