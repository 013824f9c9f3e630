//! The production request handler.
//!
//! # Responsibilities
//! - Run the optional prehook / posthook around rendering
//! - Serve full documents when SSR is enabled and the pathname resolves
//! - Serve partial renders under the `{base_path}{rsc_path}/` prefix
//! - Map failures to status codes; decline everything else
//!
//! # Design Decisions
//! - A posthook requires a prehook (it receives the prehook's context)
//! - The context is frozen after a successful partial render
//! - Unsupported methods on the partial-render prefix are a protocol error
//!   returned to the caller; no response is produced for them

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::{header, request, response, Method, Request, Response, StatusCode};

use crate::config::ServerConfig;
use crate::handler::context::RequestContext;
use crate::handler::error::{HandlerError, HandlerResult};
use crate::handler::rsc::RouterRsc;
use crate::handler::template::{TemplateCache, TemplateLoader};
use crate::handler::{
    DocumentRenderer, DocumentRequest, Outcome, RenderedStream, RscRenderer, RscRequest,
};
use crate::observability::metrics;
use crate::routing::input::{decode_input, Input, SearchParams, PARAM_KEY_SKIP};
use crate::routing::router::Router;

/// Creates the request context before anything is rendered.
pub type PreHook<C> =
    Arc<dyn Fn(&request::Parts, &mut response::Parts) -> HandlerResult<C> + Send + Sync>;

/// Observes (and may mutate) the context after rendering, before streaming.
pub type PostHook<C> = Arc<
    dyn Fn(&request::Parts, &mut response::Parts, &RequestContext<C>) -> HandlerResult<()>
        + Send
        + Sync,
>;

struct Document<C> {
    templates: TemplateCache,
    renderer: Arc<dyn DocumentRenderer<C>>,
}

/// Multiplexes full-document and partial-render requests.
pub struct Handler<C> {
    base_path: String,
    rsc_prefix: String,
    ssr: bool,
    router: Arc<Router>,
    rsc: Arc<dyn RscRenderer<C>>,
    document: Option<Document<C>>,
    prehook: Option<PreHook<C>>,
    posthook: Option<PostHook<C>>,
}

/// Builder for `Handler`.
pub struct HandlerBuilder<C> {
    base_path: String,
    rsc_path: String,
    ssr: bool,
    router: Arc<Router>,
    rsc: Option<Arc<dyn RscRenderer<C>>>,
    document: Option<(Arc<dyn TemplateLoader>, Arc<dyn DocumentRenderer<C>>)>,
    prehook: Option<PreHook<C>>,
    posthook: Option<PostHook<C>>,
}

impl<C> HandlerBuilder<C>
where
    C: Send + Sync + 'static,
{
    pub fn ssr(mut self, enabled: bool) -> Self {
        self.ssr = enabled;
        self
    }

    pub fn rsc_renderer(mut self, renderer: Arc<dyn RscRenderer<C>>) -> Self {
        self.rsc = Some(renderer);
        self
    }

    /// Collaborators for full-document rendering.
    pub fn document(
        mut self,
        templates: Arc<dyn TemplateLoader>,
        renderer: Arc<dyn DocumentRenderer<C>>,
    ) -> Self {
        self.document = Some((templates, renderer));
        self
    }

    pub fn prehook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&request::Parts, &mut response::Parts) -> HandlerResult<C> + Send + Sync + 'static,
    {
        self.prehook = Some(Arc::new(hook));
        self
    }

    pub fn posthook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&request::Parts, &mut response::Parts, &RequestContext<C>) -> HandlerResult<()>
            + Send
            + Sync
            + 'static,
    {
        self.posthook = Some(Arc::new(hook));
        self
    }

    pub fn build(self) -> HandlerResult<Handler<C>> {
        if self.prehook.is_none() && self.posthook.is_some() {
            return Err(HandlerError::Config(
                "prehook is required if posthook is provided".into(),
            ));
        }
        if self.ssr && self.document.is_none() {
            return Err(HandlerError::Config(
                "ssr requires a template loader and document renderer".into(),
            ));
        }

        let mut base_path = self.base_path;
        if !base_path.ends_with('/') {
            base_path.push('/');
        }
        let rsc_prefix = format!("{}{}/", base_path, self.rsc_path.trim_matches('/'));
        let rsc = self
            .rsc
            .unwrap_or_else(|| Arc::new(RouterRsc::new(self.router.clone())));
        let document = self.document.map(|(loader, renderer)| Document {
            templates: TemplateCache::new(loader),
            renderer,
        });

        tracing::info!(
            base_path = %base_path,
            rsc_prefix = %rsc_prefix,
            ssr = self.ssr,
            "Handler configured"
        );

        Ok(Handler {
            base_path,
            rsc_prefix,
            ssr: self.ssr,
            router: self.router,
            rsc,
            document,
            prehook: self.prehook,
            posthook: self.posthook,
        })
    }
}

impl<C> Handler<C>
where
    C: Send + Sync + 'static,
{
    pub fn builder(config: &ServerConfig, router: Arc<Router>) -> HandlerBuilder<C> {
        HandlerBuilder {
            base_path: config.base_path.clone(),
            rsc_path: config.rsc_path.clone(),
            ssr: config.ssr,
            router,
            rsc: None,
            document: None,
            prehook: None,
            posthook: None,
        }
    }

    /// Prefix under which partial renders are served.
    pub fn rsc_prefix(&self) -> &str {
        &self.rsc_prefix
    }

    /// Handle one request.
    ///
    /// Returns `Outcome::Next` with the untouched request when it is neither
    /// an SSR page nor under the partial-render prefix. Returns `Err` only for
    /// protocol errors (unsupported method on the partial-render prefix).
    pub async fn handle(&self, req: Request<Body>) -> HandlerResult<Outcome> {
        let start = Instant::now();
        let (req_parts, body) = req.into_parts();
        let (mut res_parts, ()) = Response::new(()).into_parts();
        let path_str = req_parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        tracing::debug!(method = %req_parts.method, path = %path_str, "Handling request");

        let context = match &self.prehook {
            Some(hook) => match hook(&req_parts, &mut res_parts) {
                Ok(value) => Some(RequestContext::new(value)),
                Err(e) => return Ok(self.error_response(res_parts, e, start)),
            },
            None => None,
        };

        if self.ssr {
            match self.render_document(&req_parts, context.clone()).await {
                Ok(Some((rendered, next_context))) => {
                    let next_context = next_context.or(context);
                    if let Err(e) =
                        self.run_posthook(&req_parts, &mut res_parts, next_context.as_ref())
                    {
                        return Ok(self.error_response(res_parts, e, start));
                    }
                    metrics::record_request("ssr", res_parts.status.as_u16(), start);
                    return Ok(Outcome::Response(respond(res_parts, rendered)));
                }
                Ok(None) => {}
                Err(e) => return Ok(self.error_response(res_parts, e, start)),
            }
        }

        if let Some(suffix) = path_str.strip_prefix(&self.rsc_prefix) {
            let method = req_parts.method.clone();
            if method != Method::GET && method != Method::POST {
                tracing::error!(method = %method, path = %path_str, "Unsupported method");
                return Err(HandlerError::UnsupportedMethod(method));
            }

            let rendered = match self
                .dispatch_rsc(suffix, &req_parts, body, context.clone())
                .await
            {
                Ok(rendered) => rendered,
                Err(e) => return Ok(self.error_response(res_parts, e, start)),
            };
            if let Err(e) = self.run_posthook(&req_parts, &mut res_parts, context.as_ref()) {
                return Ok(self.error_response(res_parts, e, start));
            }
            if let Some(ctx) = &context {
                ctx.freeze();
            }
            metrics::record_request("rsc", res_parts.status.as_u16(), start);
            return Ok(Outcome::Response(respond(res_parts, rendered)));
        }

        tracing::trace!(path = %path_str, "Declining request");
        Ok(Outcome::Next(Request::from_parts(req_parts, body)))
    }

    async fn render_document(
        &self,
        req_parts: &request::Parts,
        context: Option<RequestContext<C>>,
    ) -> HandlerResult<Option<(RenderedStream, Option<RequestContext<C>>)>> {
        let Some(document) = &self.document else {
            return Ok(None);
        };
        let Some(pathname) = self.logical_pathname(req_parts.uri.path()) else {
            return Ok(None);
        };
        let Some(ssr) = self.router.get_ssr_config(&pathname).await? else {
            return Ok(None);
        };

        let template = document.templates.get(&pathname).await?;

        // A document always carries the whole tree.
        let mut params = SearchParams::new();
        for (k, v) in SearchParams::parse(req_parts.uri.query().unwrap_or("")).iter() {
            if k != PARAM_KEY_SKIP {
                params.append(k, v);
            }
        }
        let input = Input::parse(&ssr.input).with_search_params(params);
        let Some(entries) = self.router.render_entries(&input).await? else {
            return Ok(None);
        };

        let request = DocumentRequest {
            pathname: &pathname,
            template: &template,
            ssr: &ssr,
            entries: &entries,
        };
        document.renderer.render_document(request, context).await
    }

    async fn dispatch_rsc(
        &self,
        suffix: &str,
        req_parts: &request::Parts,
        body: Body,
        context: Option<RequestContext<C>>,
    ) -> HandlerResult<RenderedStream> {
        let (encoded, query) = suffix.split_once('?').unwrap_or((suffix, ""));
        let decoded = decode_input(encoded)?;
        let input = Input::parse(&decoded).with_search_params(SearchParams::parse(query));
        let content_type = req_parts
            .headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        tracing::debug!(
            pathname = %input.pathname(),
            skip = input.skip_ids().len(),
            "Dispatching partial render"
        );

        self.rsc
            .render_rsc(RscRequest {
                input,
                method: req_parts.method.clone(),
                content_type,
                body,
                context,
            })
            .await
    }

    /// Pathname relative to the base path, or `None` if outside it.
    fn logical_pathname(&self, path: &str) -> Option<String> {
        if self.base_path == "/" {
            return Some(path.to_string());
        }
        let rest = path.strip_prefix(self.base_path.trim_end_matches('/'))?;
        match rest {
            "" => Some("/".to_string()),
            r if r.starts_with('/') => Some(r.to_string()),
            _ => None,
        }
    }

    fn run_posthook(
        &self,
        req_parts: &request::Parts,
        res_parts: &mut response::Parts,
        context: Option<&RequestContext<C>>,
    ) -> HandlerResult<()> {
        match (&self.posthook, context) {
            (Some(hook), Some(ctx)) => hook(req_parts, res_parts, ctx),
            _ => Ok(()),
        }
    }

    fn error_response(
        &self,
        mut parts: response::Parts,
        err: HandlerError,
        start: Instant,
    ) -> Outcome {
        let status = match err.status_code() {
            Some(status) => {
                tracing::debug!(status = %status, error = %err, "Request failed");
                status
            }
            None => {
                tracing::error!(error = %err, "Cannot render request");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        parts.status = status;
        metrics::record_request("error", status.as_u16(), start);
        Outcome::Response(Response::from_parts(parts, Body::empty()))
    }
}

fn respond(mut parts: response::Parts, rendered: RenderedStream) -> Response<Body> {
    parts.headers.insert(header::CONTENT_TYPE, rendered.content_type);
    Response::from_parts(parts, rendered.body)
}
