//! Nested component identifiers.
//!
//! A pathname with segments `s1..sn` renders the layout chain
//! `layout`, `s1/layout`, ..., `s1/../sn/layout` followed by the page
//! `s1/../sn/page`, outermost first. Derivation depends on the pathname
//! alone, never on the registered routes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::routing::matcher::split_segments;

/// Reserved id carrying the should-skip table snapshot.
///
/// Real ids never start with `/`, so this cannot collide with one.
pub const SHOULD_SKIP_ID: &str = "/SHOULD_SKIP";

/// Identifies one nesting level (layout or page) along a resolved path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The reserved should-skip id.
    pub fn should_skip() -> Self {
        Self(SHOULD_SKIP_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_should_skip(&self) -> bool {
        self.0 == SHOULD_SKIP_ID
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl PartialEq<str> for ComponentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Derive the ordered component ids for a pathname.
pub fn component_ids(pathname: &str) -> Vec<ComponentId> {
    let items: Vec<&str> = split_segments(pathname).collect();
    let mut ids = Vec::with_capacity(items.len() + 2);

    for depth in 0..=items.len() {
        let mut parts = items[..depth].to_vec();
        parts.push("layout");
        ids.push(ComponentId(parts.join("/")));
    }

    let mut page = items;
    page.push("page");
    ids.push(ComponentId(page.join("/")));
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(pathname: &str) -> Vec<String> {
        component_ids(pathname).into_iter().map(|id| id.0).collect()
    }

    #[test]
    fn test_root_ids() {
        assert_eq!(ids("/"), vec!["layout", "page"]);
        assert_eq!(ids(""), vec!["layout", "page"]);
    }

    #[test]
    fn test_nested_ids() {
        assert_eq!(
            ids("/a/b"),
            vec!["layout", "a/layout", "a/b/layout", "a/b/page"]
        );
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(component_ids("/x/y/z"), component_ids("/x/y/z"));
        assert_eq!(component_ids("/x//y/"), component_ids("/x/y"));
    }

    #[test]
    fn test_never_collides_with_reserved_id() {
        for path in ["/", "/SHOULD_SKIP", "/a/SHOULD_SKIP", "//SHOULD_SKIP"] {
            assert!(component_ids(path).iter().all(|id| !id.is_should_skip()));
        }
    }
}
