//! Production request handling.
//!
//! # Data Flow
//! ```text
//! Request
//!     → prehook (creates RequestContext)
//!     → [ssr] router.get_ssr_config + render_entries → DocumentRenderer
//!     → [path under rsc prefix] decode input → RscRenderer (entries stream)
//!     → posthook → freeze context → stream out
//!     → otherwise: Outcome::Next (declined)
//! ```
//!
//! # Design Decisions
//! - One linear state machine per request; no fall-through after SSR produced
//!   a result or failed
//! - Errors with an explicit status pass through; everything else is a 500
//! - Partial results are never streamed

pub mod context;
pub mod error;
pub mod production;
pub mod rsc;
pub mod template;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, Response};

use crate::render::entries::EntriesMap;
use crate::routing::input::Input;
use crate::routing::router::SsrConfig;

pub use context::{ContextError, RequestContext};
pub use error::{BoxError, HandlerError, HandlerResult};
pub use production::{Handler, HandlerBuilder, PostHook, PreHook};
pub use rsc::RouterRsc;
pub use template::{FsTemplateLoader, TemplateCache, TemplateError, TemplateLoader};

/// Result of handling one request.
#[derive(Debug)]
pub enum Outcome {
    /// A response was produced.
    Response(Response<Body>),
    /// The request is not ours; hand it to the next handler.
    Next(Request<Body>),
}

/// A rendered body ready to be streamed.
#[derive(Debug)]
pub struct RenderedStream {
    pub content_type: HeaderValue,
    pub body: Body,
}

/// Everything a document renderer needs to produce a full page.
#[derive(Debug)]
pub struct DocumentRequest<'a> {
    pub pathname: &'a str,
    pub template: &'a str,
    pub ssr: &'a SsrConfig,
    pub entries: &'a EntriesMap,
}

/// Turns an SSR config and its entries into a full document.
#[async_trait]
pub trait DocumentRenderer<C>: Send + Sync
where
    C: Send + Sync + 'static,
{
    /// Returns `None` to decline, otherwise the document and the context
    /// to hand to the posthook.
    async fn render_document(
        &self,
        request: DocumentRequest<'_>,
        context: Option<RequestContext<C>>,
    ) -> HandlerResult<Option<(RenderedStream, Option<RequestContext<C>>)>>;
}

/// A decoded partial-render request.
#[derive(Debug)]
pub struct RscRequest<C> {
    pub input: Input,
    pub method: Method,
    pub content_type: Option<String>,
    pub body: Body,
    pub context: Option<RequestContext<C>>,
}

/// Produces the partial-render stream for a request.
#[async_trait]
pub trait RscRenderer<C>: Send + Sync
where
    C: Send + Sync + 'static,
{
    async fn render_rsc(&self, request: RscRequest<C>) -> HandlerResult<RenderedStream>;
}
