//! Per-request mapping from component id to rendered node.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::render::node::Node;
use crate::routing::component_id::ComponentId;

/// Rendered entries in component nesting order.
///
/// Built fresh for every request and never mutated once handed to an encoder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntriesMap {
    entries: Vec<(ComponentId, Node)>,
}

impl EntriesMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any previous node for the same id.
    pub fn insert(&mut self, id: ComponentId, node: Node) {
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some(slot) => slot.1 = node,
            None => self.entries.push((id, node)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == id)
            .map(|(_, node)| node)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.entries.iter().map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ComponentId, &Node)> {
        self.entries.iter().map(|(id, node)| (id, node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(ComponentId, Node)> for EntriesMap {
    fn from_iter<I: IntoIterator<Item = (ComponentId, Node)>>(iter: I) -> Self {
        let mut map = EntriesMap::new();
        for (id, node) in iter {
            map.insert(id, node);
        }
        map
    }
}

impl IntoIterator for EntriesMap {
    type Item = (ComponentId, Node);
    type IntoIter = std::vec::IntoIter<(ComponentId, Node)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for EntriesMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, node) in &self.entries {
            map.serialize_entry(id, node)?;
        }
        map.end()
    }
}
