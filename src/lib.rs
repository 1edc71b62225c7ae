//! # movie-recommender-api
//!
//! Backend API for the Movie Recommender application.
//!
//! Proxies TMDB's weekly trending-movies list, caching it for a day in a
//! document store (Firebase Realtime Database), and records user
//! interaction events in the same store.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── TrendingService / InteractionService (service/)
//!     │
//!     ├── MetadataSource ── TMDB (metadata/)
//!     │
//!     └── DocumentStore ── Firebase RTDB | in-memory (store/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod metadata;
pub mod service;
pub mod store;
