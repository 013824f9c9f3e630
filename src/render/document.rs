//! Template-based document rendering.
//!
//! The slot tree is rendered to markup and injected into the HTML template
//! together with the serialized entries, so the client can pick up the same
//! tree without a second request.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::HeaderValue;

use crate::handler::{
    DocumentRenderer, DocumentRequest, HandlerResult, RenderedStream, RequestContext,
};
use crate::render::html::render_to_string;
use crate::render::RenderError;

/// Marker replaced by the rendered body when present in the template.
pub const BODY_MARKER: &str = "<!--rsc-router-body-->";

/// Id of the script element holding the serialized entries.
pub const ENTRIES_SCRIPT_ID: &str = "__RSC_ROUTER_ENTRIES__";

/// Renders documents by injecting markup into the HTML template.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateDocumentRenderer;

impl TemplateDocumentRenderer {
    /// Produce the full document text.
    pub fn render(&self, request: &DocumentRequest<'_>) -> Result<String, RenderError> {
        let markup = render_to_string(&request.ssr.body, request.entries);
        // Keep `</script>` inside the payload from closing the element.
        let payload = serde_json::to_string(request.entries)?.replace("</", "<\\/");
        let injected = format!(
            r#"<div id="root">{markup}</div><script type="application/json" id="{ENTRIES_SCRIPT_ID}" data-input="{input}">{payload}</script>"#,
            input = escape_attr(&request.ssr.input),
        );

        let template = request.template;
        let document = if template.contains(BODY_MARKER) {
            template.replacen(BODY_MARKER, &injected, 1)
        } else if let Some(pos) = template.rfind("</body>") {
            format!("{}{}{}", &template[..pos], injected, &template[pos..])
        } else {
            format!("{}{}", template, injected)
        };
        Ok(document)
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

#[async_trait]
impl<C> DocumentRenderer<C> for TemplateDocumentRenderer
where
    C: Send + Sync + 'static,
{
    async fn render_document(
        &self,
        request: DocumentRequest<'_>,
        context: Option<RequestContext<C>>,
    ) -> HandlerResult<Option<(RenderedStream, Option<RequestContext<C>>)>> {
        let document = self.render(&request)?;
        tracing::debug!(pathname = %request.pathname, bytes = document.len(), "Rendered document");
        let rendered = RenderedStream {
            content_type: HeaderValue::from_static("text/html; charset=utf-8"),
            body: Body::from(document),
        };
        Ok(Some((rendered, context)))
    }
}
