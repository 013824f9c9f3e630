//! Process-wide should-skip table.
//!
//! Components may declare themselves skippable for later requests. The
//! table is owned by the router and handed to each component load as a
//! `SkipSetter` that can only touch that component's own entry, so there
//! are no write-write races between concurrent renders. The whole table is
//! sent to the client under `SHOULD_SKIP_ID`.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::routing::component_id::ComponentId;

/// Hint telling the client when a component's previous render stays valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkipMarker {
    /// Re-render when the pathname changes.
    pub path: bool,
    /// Re-render when any of these search parameters change.
    pub keys: Vec<String>,
}

/// Shared should-skip table. Cloning shares the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct ShouldSkipStore {
    inner: Arc<DashMap<ComponentId, SkipMarker>>,
}

impl ShouldSkipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A setter scoped to `id`.
    pub fn setter(&self, id: ComponentId) -> SkipSetter {
        SkipSetter {
            id,
            inner: self.inner.clone(),
        }
    }

    pub fn get(&self, id: &ComponentId) -> Option<SkipMarker> {
        self.inner.get(id).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Ordered copy of the full table.
    pub fn snapshot(&self) -> BTreeMap<ComponentId, SkipMarker> {
        self.inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }
}

/// Write access to a single entry of the should-skip table.
#[derive(Debug, Clone)]
pub struct SkipSetter {
    id: ComponentId,
    inner: Arc<DashMap<ComponentId, SkipMarker>>,
}

impl SkipSetter {
    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    /// Set the marker for this id; `None` removes it.
    pub fn set(&self, marker: Option<SkipMarker>) {
        match marker {
            Some(marker) => {
                tracing::trace!(component = %self.id, "Marking component skippable");
                self.inner.insert(self.id.clone(), marker);
            }
            None => {
                self.inner.remove(&self.id);
            }
        }
    }
}
