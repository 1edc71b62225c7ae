//! Data Transfer Objects for REST responses.
//!
//! Request bodies deserialize straight into domain types; only response
//! envelopes live here.

pub mod interaction_dto;

pub use interaction_dto::*;
