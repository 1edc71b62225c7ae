//! Domain layer: the cache document and interaction records.
//!
//! Movie records themselves are never modeled; they stay opaque
//! `serde_json::Value`s from the upstream API to the HTTP response.

pub mod cache_entry;
pub mod interaction;
pub mod interaction_id;

pub use cache_entry::TrendingCacheEntry;
pub use interaction::{EventData, InteractionEvent, InteractionRecord};
pub use interaction_id::InteractionId;
