//! Request inputs for partial renders.
//!
//! An `Input` is the canonical request key of a partial render: a pathname
//! plus query-style parameters. Its string form drops the pathname's leading
//! slash and appends the parameters as a query string:
//!
//! ```text
//! Input { "/a/b", [rsc_router_skip=layout] }  <->  "a/b?rsc_router_skip=layout"
//! ```
//!
//! On the wire the path part is further encoded as `<input>.txt`
//! (`index.txt` for the root) by `encode_input` / `decode_input`.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use url::form_urlencoded;

use crate::routing::component_id::ComponentId;

/// Repeatable parameter listing component ids the client already has.
pub const PARAM_KEY_SKIP: &str = "rsc_router_skip";

const ENCODED_SUFFIX: &str = ".txt";
const ENCODED_INDEX: &str = "index.txt";

/// Errors raised while building or decoding inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("pathname '{0}' must start with '/'")]
    MissingLeadingSlash(String),

    #[error("input must not be 'index'")]
    ReservedIndex,

    #[error("input '{0}' must not start or end with '/'")]
    StraySlash(String),

    #[error("invalid encoded input '{0}'")]
    InvalidEncoding(String),

    #[error("pathname '{0}' must not contain '?'")]
    QueryInPathname(String),
}

/// Ordered, repeatable query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchParams(Vec<(String, String)>);

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    pub fn parse(query: &str) -> Self {
        Self(form_urlencoded::parse(query.as_bytes()).into_owned().collect())
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn extend(&mut self, other: SearchParams) {
        self.0.extend(other.0);
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// All values for `key`, in order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

/// A decoded partial-render request key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pathname: String,
    search_params: SearchParams,
}

impl Input {
    /// Create an input for a pathname. The pathname must start with `/`.
    pub fn new(pathname: impl Into<String>) -> Result<Self, InputError> {
        let pathname = pathname.into();
        if !pathname.starts_with('/') {
            return Err(InputError::MissingLeadingSlash(pathname));
        }
        if pathname.contains('?') {
            return Err(InputError::QueryInPathname(pathname));
        }
        Ok(Self {
            pathname,
            search_params: SearchParams::new(),
        })
    }

    /// Parse the string form produced by `Display`.
    pub fn parse(input: &str) -> Self {
        let (path, query) = input.split_once('?').unwrap_or((input, ""));
        Self {
            pathname: format!("/{}", path),
            search_params: SearchParams::parse(query),
        }
    }

    /// Add component ids the client already holds.
    pub fn with_skip<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = ComponentId>,
    {
        for id in ids {
            self.search_params.append(PARAM_KEY_SKIP, id.as_str());
        }
        self
    }

    pub fn with_search_params(mut self, params: SearchParams) -> Self {
        self.search_params.extend(params);
        self
    }

    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    pub fn search_params(&self) -> &SearchParams {
        &self.search_params
    }

    /// The skip list carried by this input.
    pub fn skip_ids(&self) -> Vec<ComponentId> {
        self.search_params
            .get_all(PARAM_KEY_SKIP)
            .into_iter()
            .map(ComponentId::from)
            .collect()
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pathname[1..])?;
        if !self.search_params.is_empty() {
            write!(f, "?{}", self.search_params.to_query_string())?;
        }
        Ok(())
    }
}

/// The input string for a bare pathname.
pub fn input_string(pathname: &str) -> Result<String, InputError> {
    Ok(Input::new(pathname)?.to_string())
}

/// Encode the path part of an input for use in a URL.
pub fn encode_input(input: &str) -> Result<String, InputError> {
    if input.is_empty() {
        return Ok(ENCODED_INDEX.to_string());
    }
    if input == "index" {
        return Err(InputError::ReservedIndex);
    }
    if input.starts_with('/') || input.ends_with('/') {
        return Err(InputError::StraySlash(input.to_string()));
    }
    Ok(format!("{}{}", input, ENCODED_SUFFIX))
}

/// Decode a URL suffix produced by `encode_input`.
pub fn decode_input(encoded: &str) -> Result<String, InputError> {
    if encoded == ENCODED_INDEX {
        return Ok(String::new());
    }
    encoded
        .strip_suffix(ENCODED_SUFFIX)
        .map(str::to_string)
        .ok_or_else(|| InputError::InvalidEncoding(encoded.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pathname_roundtrip() {
        for pathname in ["/", "/a", "/a/b/c"] {
            let input = Input::new(pathname).unwrap();
            assert_eq!(Input::parse(&input.to_string()).pathname(), pathname);
        }
    }

    #[test]
    fn test_roundtrip_preserves_skip_set() {
        let skip = vec![ComponentId::from("layout"), ComponentId::from("a/layout")];
        let input = Input::new("/a/b").unwrap().with_skip(skip.clone());
        let encoded = input.to_string();
        assert_eq!(encoded, "a/b?rsc_router_skip=layout&rsc_router_skip=a%2Flayout");

        let decoded = Input::parse(&encoded);
        assert_eq!(decoded.pathname(), "/a/b");
        assert_eq!(decoded.skip_ids(), skip);
        assert_eq!(decoded, input);
    }

    #[test]
    fn test_query_in_pathname_rejected() {
        assert_eq!(
            Input::new("/a?x=1"),
            Err(InputError::QueryInPathname("/a?x=1".into()))
        );
        assert!(input_string("/a?b").is_err());
    }

    #[test]
    fn test_root_input_string() {
        assert_eq!(input_string("/").unwrap(), "");
        assert_eq!(input_string("/about").unwrap(), "about");
        assert_eq!(
            input_string("about"),
            Err(InputError::MissingLeadingSlash("about".into()))
        );
    }

    #[test]
    fn test_encode_decode() {
        assert_eq!(encode_input("").unwrap(), "index.txt");
        assert_eq!(encode_input("a/b").unwrap(), "a/b.txt");
        assert_eq!(encode_input("index"), Err(InputError::ReservedIndex));
        assert!(encode_input("/a").is_err());
        assert!(encode_input("a/").is_err());

        assert_eq!(decode_input("index.txt").unwrap(), "");
        assert_eq!(decode_input("a/b.txt").unwrap(), "a/b");
        assert_eq!(
            decode_input("INPUT123"),
            Err(InputError::InvalidEncoding("INPUT123".into()))
        );
    }

    #[test]
    fn test_search_params_repeatable() {
        let params = SearchParams::parse("a=1&b=2&a=3");
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get_all("a"), vec!["1", "3"]);
        assert!(params.get_all("missing").is_empty());
    }
}
