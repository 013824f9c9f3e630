//! Route pattern matching.
//!
//! # Responsibilities
//! - Represent abstract route patterns (`PathSpec`)
//! - Parse the bracket pattern syntax used in config files
//! - Match concrete pathnames and extract captured parameters
//!
//! # Design Decisions
//! - Literal matching is case-sensitive, no normalization beyond segment equality
//! - Empty path segments are dropped (`/a//b` is `/a/b`)
//! - A wildcard may only appear once, as the final segment; rejected at construction
//! - No regex to guarantee O(n) matching

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of a single pattern segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Must equal the path segment exactly.
    Literal,
    /// Matches one non-empty segment, e.g. `[slug]`.
    Group,
    /// Matches the remaining segments, e.g. `[...rest]`.
    Wildcard,
}

/// One segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSegment {
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    pub name: String,
}

impl PathSegment {
    pub fn literal(name: impl Into<String>) -> Self {
        Self { kind: SegmentKind::Literal, name: name.into() }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self { kind: SegmentKind::Group, name: name.into() }
    }

    pub fn wildcard(name: impl Into<String>) -> Self {
        Self { kind: SegmentKind::Wildcard, name: name.into() }
    }
}

/// Errors raised while building a `PathSpec`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathSpecError {
    #[error("wildcard segment '{0}' must be the last segment")]
    WildcardNotLast(String),

    #[error("pattern contains more than one wildcard segment")]
    MultipleWildcards,

    #[error("empty parameter name in segment '{0}'")]
    EmptyName(String),

    #[error("pattern '{0}' must start with '/'")]
    MissingLeadingSlash(String),

    #[error("segment '{0}' must not contain '?'")]
    QueryInSegment(String),
}

/// An abstract route pattern: an ordered list of segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PathSpec {
    segments: Vec<PathSegment>,
}

impl PathSpec {
    /// Build a pattern, enforcing the wildcard placement policy.
    pub fn new(segments: Vec<PathSegment>) -> Result<Self, PathSpecError> {
        let wildcards = segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Wildcard)
            .count();
        if wildcards > 1 {
            return Err(PathSpecError::MultipleWildcards);
        }
        if let Some(pos) = segments.iter().position(|s| s.kind == SegmentKind::Wildcard) {
            if pos + 1 != segments.len() {
                return Err(PathSpecError::WildcardNotLast(segments[pos].name.clone()));
            }
        }
        if let Some(seg) = segments.iter().find(|s| s.name.contains('?')) {
            return Err(PathSpecError::QueryInSegment(seg.name.clone()));
        }
        if let Some(seg) = segments
            .iter()
            .find(|s| s.kind != SegmentKind::Literal && s.name.is_empty())
        {
            return Err(PathSpecError::EmptyName(format!("{:?}", seg.kind)));
        }
        Ok(Self { segments })
    }

    /// Parse a pattern such as `/posts/[slug]` or `/docs/[...rest]`.
    pub fn parse(pattern: &str) -> Result<Self, PathSpecError> {
        if !pattern.starts_with('/') {
            return Err(PathSpecError::MissingLeadingSlash(pattern.to_string()));
        }
        let segments = split_segments(pattern)
            .map(|raw| match raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                Some(inner) => match inner.strip_prefix("...") {
                    Some(name) if !name.is_empty() => Ok(PathSegment::wildcard(name)),
                    Some(_) => Err(PathSpecError::EmptyName(raw.to_string())),
                    None if !inner.is_empty() => Ok(PathSegment::group(inner)),
                    None => Err(PathSpecError::EmptyName(raw.to_string())),
                },
                None => Ok(PathSegment::literal(raw)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// True when every segment is a literal.
    pub fn is_literal(&self) -> bool {
        self.segments.iter().all(|s| s.kind == SegmentKind::Literal)
    }

    /// The concrete pathname of an all-literal pattern.
    pub fn literal_pathname(&self) -> Option<String> {
        if !self.is_literal() {
            return None;
        }
        let names: Vec<&str> = self.segments.iter().map(|s| s.name.as_str()).collect();
        Some(format!("/{}", names.join("/")))
    }
}

impl<'de> Deserialize<'de> for PathSpec {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let segments = Vec::<PathSegment>::deserialize(deserializer)?;
        PathSpec::new(segments).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for seg in &self.segments {
            match seg.kind {
                SegmentKind::Literal => write!(f, "/{}", seg.name)?,
                SegmentKind::Group => write!(f, "/[{}]", seg.name)?,
                SegmentKind::Wildcard => write!(f, "/[...{}]", seg.name)?,
            }
        }
        Ok(())
    }
}

/// A captured parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    One(String),
    Many(Vec<String>),
}

/// Parameters captured by a successful match, keyed by segment name.
pub type PathParams = BTreeMap<String, ParamValue>;

pub(crate) fn split_segments(pathname: &str) -> impl Iterator<Item = &str> {
    pathname.split('/').filter(|s| !s.is_empty())
}

/// Match a pathname against a pattern, returning captured parameters.
pub fn match_path(spec: &PathSpec, pathname: &str) -> Option<PathParams> {
    let items: Vec<&str> = split_segments(pathname).collect();
    let mut params = PathParams::new();

    for (i, seg) in spec.segments.iter().enumerate() {
        match seg.kind {
            SegmentKind::Literal => {
                if items.get(i) != Some(&seg.name.as_str()) {
                    return None;
                }
            }
            SegmentKind::Group => {
                let value = items.get(i)?;
                params.insert(seg.name.clone(), ParamValue::One((*value).to_string()));
            }
            SegmentKind::Wildcard => {
                // Construction guarantees this is the last segment.
                let rest = items.get(i..).filter(|rest| !rest.is_empty())?;
                let values = rest.iter().map(|s| s.to_string()).collect();
                params.insert(seg.name.clone(), ParamValue::Many(values));
                return Some(params);
            }
        }
    }

    (items.len() == spec.segments.len()).then_some(params)
}

/// Returns true if `pathname` satisfies `spec`.
pub fn matches(spec: &PathSpec, pathname: &str) -> bool {
    match_path(spec, pathname).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        let spec = PathSpec::parse("/about/team").unwrap();
        assert!(matches(&spec, "/about/team"));
        assert!(!matches(&spec, "/about"));
        assert!(!matches(&spec, "/about/team/extra"));
        assert!(!matches(&spec, "/About/team")); // Case sensitive
    }

    #[test]
    fn test_root_match() {
        let spec = PathSpec::parse("/").unwrap();
        assert!(spec.segments().is_empty());
        assert!(matches(&spec, "/"));
        assert!(!matches(&spec, "/a"));
    }

    #[test]
    fn test_group_captures() {
        let spec = PathSpec::parse("/posts/[slug]").unwrap();
        let params = match_path(&spec, "/posts/hello").unwrap();
        assert_eq!(params.get("slug"), Some(&ParamValue::One("hello".into())));
        assert!(match_path(&spec, "/posts").is_none());
        assert!(match_path(&spec, "/posts/").is_none());
    }

    #[test]
    fn test_wildcard_captures_suffix() {
        let spec = PathSpec::parse("/docs/[...rest]").unwrap();
        let params = match_path(&spec, "/docs/a/b/c").unwrap();
        assert_eq!(
            params.get("rest"),
            Some(&ParamValue::Many(vec!["a".into(), "b".into(), "c".into()]))
        );
        // At least one segment required
        assert!(match_path(&spec, "/docs").is_none());
    }

    #[test]
    fn test_wildcard_placement_rejected() {
        assert_eq!(
            PathSpec::parse("/[...rest]/tail"),
            Err(PathSpecError::WildcardNotLast("rest".into()))
        );
        let segments = vec![PathSegment::wildcard("a"), PathSegment::wildcard("b")];
        assert_eq!(PathSpec::new(segments), Err(PathSpecError::MultipleWildcards));
        assert!(PathSpec::parse("no-slash").is_err());
        assert!(PathSpec::parse("/[]").is_err());
    }

    #[test]
    fn test_query_character_rejected() {
        assert_eq!(
            PathSpec::parse("/a?b"),
            Err(PathSpecError::QueryInSegment("a?b".into()))
        );
        assert!(PathSpec::parse("/posts/[id?]").is_err());
    }

    #[test]
    fn test_empty_segments_ignored() {
        let spec = PathSpec::parse("/a/b").unwrap();
        assert!(matches(&spec, "/a//b/"));
    }

    #[test]
    fn test_literal_pathname() {
        assert_eq!(PathSpec::parse("/a/b").unwrap().literal_pathname(), Some("/a/b".into()));
        assert_eq!(PathSpec::parse("/").unwrap().literal_pathname(), Some("/".into()));
        assert_eq!(PathSpec::parse("/a/[id]").unwrap().literal_pathname(), None);
    }

    #[test]
    fn test_display_roundtrips_pattern() {
        for pattern in ["/", "/a/[id]", "/docs/[...rest]"] {
            assert_eq!(PathSpec::parse(pattern).unwrap().to_string(), pattern);
        }
    }

    #[test]
    fn test_serialized_shape() {
        let spec = PathSpec::parse("/a/[id]").unwrap();
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "type": "literal", "name": "a" },
                { "type": "group", "name": "id" }
            ])
        );
        let back: PathSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back, spec);
    }
}
