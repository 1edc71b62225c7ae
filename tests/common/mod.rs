#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use serde_json::{Value, json};

use movie_recommender_api::api;
use movie_recommender_api::app_state::AppState;
use movie_recommender_api::error::GatewayError;
use movie_recommender_api::metadata::MetadataSource;
use movie_recommender_api::store::{DocumentStore, InMemoryStore};

/// Metadata source returning a numbered list and counting its calls.
#[derive(Debug, Default)]
pub struct StubMetadata {
    pub calls: AtomicUsize,
    pub failure: Option<String>,
}

impl StubMetadata {
    pub fn failing(text: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failure: Some(text.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataSource for StubMetadata {
    async fn fetch_trending_movies(&self) -> Result<Vec<Value>, GatewayError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(text) = &self.failure {
            return Err(GatewayError::MetadataFetch(text.clone()));
        }
        Ok(vec![
            json!({"id": 1000 + n, "title": "Dune: Part Two", "media_type": "movie"}),
            json!({"id": 2000 + n, "title": "Inside Out 2", "media_type": "movie"}),
        ])
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
    pub metadata: Arc<StubMetadata>,
}

pub fn test_app(metadata: StubMetadata) -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let metadata = Arc::new(metadata);
    let state = AppState::new(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        Arc::clone(&metadata) as Arc<dyn MetadataSource>,
        chrono::Duration::hours(24),
        false,
    );
    let router = api::build_router().with_state(state);
    TestApp {
        router,
        store,
        metadata,
    }
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    let Ok(request) = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
    else {
        panic!("request");
    };
    request
}

pub fn get_request(uri: &str) -> Request<Body> {
    let Ok(request) = Request::builder().uri(uri).body(Body::empty()) else {
        panic!("request");
    };
    request
}

pub async fn read_json(response: axum::response::Response) -> Value {
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body");
    };
    let Ok(value) = serde_json::from_slice::<Value>(&bytes) else {
        panic!("json");
    };
    value
}

/// Serves `router` on an ephemeral local port and returns its address.
pub async fn spawn_server(router: Router) -> SocketAddr {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}
