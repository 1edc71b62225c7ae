//! Service layer: business logic orchestration.
//!
//! [`TrendingService`] owns the trending cache policy and
//! [`InteractionService`] the interaction log. Both depend only on the
//! [`crate::store::DocumentStore`] and [`crate::metadata::MetadataSource`]
//! seams, never on a concrete backend.

pub mod interaction_service;
pub mod trending_service;

pub use interaction_service::InteractionService;
pub use trending_service::TrendingService;
