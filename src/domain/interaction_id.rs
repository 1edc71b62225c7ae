//! Type-safe interaction identifier.
//!
//! [`InteractionId`] wraps the key the document store generated when the
//! interaction record was appended. Realtime Database push keys are
//! opaque strings, so unlike a UUID there is nothing to parse.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Unique identifier of a tracked interaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct InteractionId(String);

impl InteractionId {
    /// Wraps a store-generated key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_string() {
        let id = InteractionId::new("-NxYz123");
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, "\"-NxYz123\"");
    }

    #[test]
    fn display_matches_key() {
        let id = InteractionId::new("abc");
        assert_eq!(id.to_string(), "abc");
    }
}
