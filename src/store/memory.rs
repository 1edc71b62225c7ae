//! In-memory implementation of [`DocumentStore`].
//!
//! Keeps the whole tree in a `serde_json::Map` behind a
//! [`tokio::sync::RwLock`]. Not durable: everything is lost on restart.
//! Used for local development (`STORE_BACKEND=memory`) and in tests.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{DocumentStore, StoreError, StoreResult, path_segments};

/// Process-local JSON document tree.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    root: RwLock<Map<String, Value>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of direct children stored under `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidPath`] on a malformed path.
    pub async fn child_count(&self, path: &str) -> StoreResult<usize> {
        Ok(self
            .get(path)
            .await?
            .and_then(|v| v.as_object().map(Map::len))
            .unwrap_or(0))
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, path: &str) -> StoreResult<Option<Value>> {
        let segments = path_segments(path)?;
        let root = self.root.read().await;
        let Some((first, rest)) = segments.split_first() else {
            return Ok((!root.is_empty()).then(|| Value::Object(root.clone())));
        };
        let mut node = root.get(*first);
        for seg in rest {
            node = node.and_then(|n| n.get(*seg));
        }
        Ok(node.cloned())
    }

    async fn set(&self, path: &str, value: Value) -> StoreResult<()> {
        let segments = path_segments(path)?;
        let mut root = self.root.write().await;
        if segments.is_empty() {
            *root = match value {
                Value::Object(map) => map,
                Value::Null => Map::new(),
                _ => return Err(StoreError::InvalidPath(path.to_string())),
            };
            return Ok(());
        }
        assign(&mut root, &segments, value);
        Ok(())
    }

    async fn push(&self, path: &str, value: Value) -> StoreResult<String> {
        let key = uuid::Uuid::new_v4().simple().to_string();
        let child = format!("{}/{key}", path.trim_end_matches('/'));
        self.set(&child, value).await?;
        Ok(key)
    }
}

/// Writes `value` at `segments` below `map`, creating intermediate objects
/// and replacing any scalar found on the way.
fn assign(map: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [last] => {
            if value.is_null() {
                map.remove(*last);
            } else {
                map.insert((*last).to_string(), value);
            }
        }
        [head, rest @ ..] => {
            let child = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child_map) = child {
                assign(child_map, rest, value);
            }
        }
    }
}
