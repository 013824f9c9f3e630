//! Serializable UI tree.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::routing::component_id::ComponentId;

/// A rendered node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// A host element such as `div` or `meta`.
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "Map::is_empty")]
        props: Map<String, Value>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<Node>,
    },
    Text {
        value: String,
    },
    Fragment {
        #[serde(default)]
        children: Vec<Node>,
    },
    /// Placeholder for the component's nested child.
    Children,
    /// Slot filled by the entry for `id`. `children` replaces the entry's
    /// `Children` placeholder, or renders alone when the entry is missing.
    Slot {
        id: ComponentId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        children: Option<Box<Node>>,
    },
    Null,
}

impl Node {
    pub fn element(tag: impl Into<String>) -> Self {
        Node::Element {
            tag: tag.into(),
            props: Map::new(),
            children: Vec::new(),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Node::Text { value: value.into() }
    }

    pub fn fragment(children: Vec<Node>) -> Self {
        Node::Fragment { children }
    }

    /// A slot nesting `inner`.
    pub fn slot(id: ComponentId, inner: Option<Node>) -> Self {
        Node::Slot {
            id,
            children: inner.map(Box::new),
        }
    }

    /// Total number of nodes in this tree.
    pub fn node_count(&self) -> usize {
        1 + match self {
            Node::Element { children, .. } | Node::Fragment { children } => {
                children.iter().map(Node::node_count).sum()
            }
            Node::Slot { children, .. } => children.as_deref().map_or(0, Node::node_count),
            _ => 0,
        }
    }

    /// Set a prop on an element. No-op for other nodes.
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Node::Element { props, .. } = &mut self {
            props.insert(key.into(), value.into());
        }
        self
    }

    /// Append a child to an element or fragment. No-op for other nodes.
    pub fn with_child(mut self, child: Node) -> Self {
        match &mut self {
            Node::Element { children, .. } | Node::Fragment { children } => children.push(child),
            _ => {}
        }
        self
    }

    /// Replace every `Children` placeholder with `replacement`.
    pub fn fill_children(&self, replacement: &Node) -> Node {
        match self {
            Node::Children => replacement.clone(),
            Node::Element { tag, props, children } => Node::Element {
                tag: tag.clone(),
                props: props.clone(),
                children: children.iter().map(|c| c.fill_children(replacement)).collect(),
            },
            Node::Fragment { children } => Node::Fragment {
                children: children.iter().map(|c| c.fill_children(replacement)).collect(),
            },
            other => other.clone(),
        }
    }
}
