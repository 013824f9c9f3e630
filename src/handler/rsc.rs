//! Default partial-render pipeline: router entries through an encoder.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};

use crate::handler::{HandlerError, HandlerResult, RenderedStream, RscRenderer, RscRequest};
use crate::render::encoder::{EntriesEncoder, JsonLinesEncoder};
use crate::routing::input::SearchParams;
use crate::routing::router::Router;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const MAX_FORM_BYTES: usize = 1024 * 1024;

/// Renders entries with a `Router` and encodes them with an `EntriesEncoder`.
///
/// A urlencoded POST body is appended to the input's search params.
pub struct RouterRsc {
    router: Arc<Router>,
    encoder: Arc<dyn EntriesEncoder>,
}

impl RouterRsc {
    pub fn new(router: Arc<Router>) -> Self {
        Self::with_encoder(router, Arc::new(JsonLinesEncoder))
    }

    pub fn with_encoder(router: Arc<Router>, encoder: Arc<dyn EntriesEncoder>) -> Self {
        Self { router, encoder }
    }
}

fn is_form(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
        .unwrap_or(false)
}

#[async_trait]
impl<C> RscRenderer<C> for RouterRsc
where
    C: Send + Sync + 'static,
{
    async fn render_rsc(&self, request: RscRequest<C>) -> HandlerResult<RenderedStream> {
        let mut input = request.input;
        if request.method == Method::POST && is_form(request.content_type.as_deref()) {
            let bytes = axum::body::to_bytes(request.body, MAX_FORM_BYTES)
                .await
                .map_err(|e| {
                    HandlerError::status(StatusCode::BAD_REQUEST, format!("unreadable body: {}", e))
                })?;
            let form = String::from_utf8_lossy(&bytes);
            input = input.with_search_params(SearchParams::parse(&form));
        }

        let entries = self
            .router
            .render_entries(&input)
            .await?
            .ok_or_else(|| HandlerError::NotFound(input.pathname().to_string()))?;

        Ok(RenderedStream {
            content_type: self.encoder.content_type(),
            body: self.encoder.encode(entries)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_form() {
        assert!(is_form(Some("application/x-www-form-urlencoded")));
        assert!(is_form(Some("Application/X-WWW-Form-Urlencoded; charset=utf-8")));
        assert!(!is_form(Some("text/plain")));
        assert!(!is_form(None));
    }
}
