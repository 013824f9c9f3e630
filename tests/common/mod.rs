//! Shared fixtures for handler and server tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Response;

use rsc_router::config::ServerConfig;
use rsc_router::handler::{
    HandlerResult, RenderedStream, RscRenderer, RscRequest, TemplateError, TemplateLoader,
};
use rsc_router::render::{
    ComponentLoader, LoadedComponent, Node, RenderResult, StaticComponent,
};
use rsc_router::routing::{ComponentId, SkipMarker, SkipSetter, StaticPathConfig};
use rsc_router::Router;

/// Serves a fixed node per component id, counting loads.
#[derive(Default)]
pub struct MapLoader {
    nodes: HashMap<String, Node>,
    markers: HashMap<String, SkipMarker>,
    pub loads: AtomicUsize,
}

impl MapLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: &str, node: Node) -> Self {
        self.nodes.insert(id.to_string(), node);
        self
    }

    pub fn with_marker(mut self, id: &str, marker: SkipMarker) -> Self {
        self.markers.insert(id.to_string(), marker);
        self
    }
}

#[async_trait]
impl ComponentLoader for MapLoader {
    async fn load(&self, id: &ComponentId, should_skip: SkipSetter) -> RenderResult<LoadedComponent> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(marker) = self.markers.get(id.as_str()) {
            should_skip.set(Some(marker.clone()));
        }
        Ok(match self.nodes.get(id.as_str()) {
            Some(node) => LoadedComponent::Default(Arc::new(StaticComponent::new(node.clone()))),
            None => LoadedComponent::Absent,
        })
    }
}

/// Templates held in memory, keyed by pathname.
#[derive(Default)]
pub struct MemoryTemplates {
    templates: HashMap<String, String>,
}

impl MemoryTemplates {
    pub fn with(mut self, pathname: &str, html: &str) -> Self {
        self.templates.insert(pathname.to_string(), html.to_string());
        self
    }
}

#[async_trait]
impl TemplateLoader for MemoryTemplates {
    async fn load(&self, pathname: &str) -> Result<String, TemplateError> {
        self.templates
            .get(pathname)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(pathname.to_string()))
    }
}

/// Renderer that records it was called and returns a fixed body.
#[derive(Default)]
pub struct CountingRsc {
    pub calls: AtomicUsize,
}

#[async_trait]
impl RscRenderer<u32> for CountingRsc {
    async fn render_rsc(&self, _request: RscRequest<u32>) -> HandlerResult<RenderedStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(RenderedStream {
            content_type: "text/x-component".parse().unwrap(),
            body: Body::from("ok"),
        })
    }
}

/// Layout + page fixture for `/` and `/posts/[slug]`.
pub fn site_loader() -> MapLoader {
    MapLoader::new()
        .with("layout", Node::element("main").with_child(Node::Children))
        .with("page", Node::text("home"))
        .with("posts/layout", Node::element("section").with_child(Node::Children))
        .with("posts/hello/page", Node::text("post"))
}

pub fn site_router(loader: MapLoader) -> Arc<Router> {
    let provider = StaticPathConfig::from_patterns([("/", true), ("/posts/[slug]", false)]).unwrap();
    Arc::new(Router::new(Arc::new(provider), Arc::new(loader)))
}

pub fn server_config(ssr: bool) -> ServerConfig {
    ServerConfig {
        ssr,
        ..ServerConfig::default()
    }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
