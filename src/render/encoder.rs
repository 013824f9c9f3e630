//! Wire encoding of rendered entries.

use axum::body::Body;
use axum::http::HeaderValue;
use bytes::Bytes;
use futures_util::stream;
use serde::Serialize;

use crate::render::entries::EntriesMap;
use crate::render::node::Node;
use crate::render::RenderResult;
use crate::routing::component_id::ComponentId;

/// Content type of partial-render responses.
pub const RSC_CONTENT_TYPE: &str = "text/x-component";

/// Encodes an entries map into a response body.
pub trait EntriesEncoder: Send + Sync {
    fn content_type(&self) -> HeaderValue;

    /// Encode `entries`. Must fail before producing any bytes if it fails at all.
    fn encode(&self, entries: EntriesMap) -> RenderResult<Body>;
}

#[derive(Serialize)]
struct Line<'a> {
    id: &'a ComponentId,
    node: &'a Node,
}

/// One JSON object per line: `{"id": ..., "node": ...}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinesEncoder;

impl EntriesEncoder for JsonLinesEncoder {
    fn content_type(&self) -> HeaderValue {
        HeaderValue::from_static(RSC_CONTENT_TYPE)
    }

    fn encode(&self, entries: EntriesMap) -> RenderResult<Body> {
        let chunks = entries
            .iter()
            .map(|(id, node)| -> RenderResult<Bytes> {
                let mut line = serde_json::to_vec(&Line { id, node })?;
                line.push(b'\n');
                Ok(Bytes::from(line))
            })
            .collect::<RenderResult<Vec<Bytes>>>()?;
        Ok(Body::from_stream(stream::iter(
            chunks.into_iter().map(Ok::<_, std::io::Error>),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_encodes_one_line_per_entry() {
        let mut entries = EntriesMap::new();
        entries.insert("layout".into(), Node::Children);
        entries.insert("page".into(), Node::text("hi"));

        let body = JsonLinesEncoder.encode(entries).unwrap();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            "{\"id\":\"layout\",\"node\":{\"type\":\"children\"}}\n\
             {\"id\":\"page\",\"node\":{\"type\":\"text\",\"value\":\"hi\"}}\n"
        );
        assert_eq!(JsonLinesEncoder.content_type(), RSC_CONTENT_TYPE);
    }
}
