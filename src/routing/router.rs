//! Route resolution and entry rendering.
//!
//! # Responsibilities
//! - Fetch the path config once and keep it for the router's lifetime
//! - Resolve pathnames to routes (first match wins)
//! - Render the component entries of a partial-render request
//! - Build the SSR slot tree and the build-time route config
//!
//! # Design Decisions
//! - The should-skip table is owned here and injected into every load as a
//!   setter scoped to one component id
//! - Component renders of one request run concurrently; output order is the
//!   component id order, never completion order
//! - Any load or render failure fails the whole request

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::observability::metrics;
use crate::render::component::{ComponentLoader, RouteProps};
use crate::render::entries::EntriesMap;
use crate::render::node::Node;
use crate::render::{RenderError, RenderResult};
use crate::routing::build::{build_config, BuildConfigEntry, ClientModuleCollector};
use crate::routing::component_id::{component_ids, ComponentId};
use crate::routing::input::{input_string, Input};
use crate::routing::matcher::{match_path, PathParams, PathSpec, PathSpecError};
use crate::routing::should_skip::ShouldSkipStore;

/// `name` of the meta element carrying the should-skip snapshot.
pub const SHOULD_SKIP_META: &str = "rsc-router-should-skip";

/// One routable pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    pub path: PathSpec,
    pub is_static: bool,
}

impl RouteConfig {
    pub fn new(path: PathSpec, is_static: bool) -> Self {
        Self { path, is_static }
    }
}

/// Source of the routable patterns.
#[async_trait]
pub trait PathConfigProvider: Send + Sync {
    async fn path_config(&self) -> RenderResult<Vec<RouteConfig>>;
}

/// A fixed list of routes.
#[derive(Debug, Clone, Default)]
pub struct StaticPathConfig {
    routes: Vec<RouteConfig>,
}

impl StaticPathConfig {
    pub fn new(routes: Vec<RouteConfig>) -> Self {
        Self { routes }
    }

    /// Build from `(pattern, is_static)` pairs such as `("/posts/[slug]", false)`.
    pub fn from_patterns<'a, I>(patterns: I) -> Result<Self, PathSpecError>
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let routes = patterns
            .into_iter()
            .map(|(pattern, is_static)| Ok(RouteConfig::new(PathSpec::parse(pattern)?, is_static)))
            .collect::<Result<Vec<_>, PathSpecError>>()?;
        Ok(Self { routes })
    }
}

#[async_trait]
impl PathConfigProvider for StaticPathConfig {
    async fn path_config(&self) -> RenderResult<Vec<RouteConfig>> {
        Ok(self.routes.clone())
    }
}

/// Input and slot tree for rendering a full document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SsrConfig {
    pub input: String,
    pub body: Node,
}

/// Maps pathnames to nested component trees.
pub struct Router {
    provider: Arc<dyn PathConfigProvider>,
    path_config: OnceCell<Vec<RouteConfig>>,
    loader: Arc<dyn ComponentLoader>,
    should_skip: ShouldSkipStore,
}

impl Router {
    pub fn new(provider: Arc<dyn PathConfigProvider>, loader: Arc<dyn ComponentLoader>) -> Self {
        Self {
            provider,
            path_config: OnceCell::new(),
            loader,
            should_skip: ShouldSkipStore::new(),
        }
    }

    /// The registered routes, fetched on first use.
    pub async fn path_config(&self) -> RenderResult<&[RouteConfig]> {
        let routes = self
            .path_config
            .get_or_try_init(|| async {
                let routes = self.provider.path_config().await?;
                tracing::info!(routes = routes.len(), "Path config loaded");
                Ok::<_, RenderError>(routes)
            })
            .await?;
        Ok(routes.as_slice())
    }

    pub fn should_skip(&self) -> &ShouldSkipStore {
        &self.should_skip
    }

    /// The first route matching `pathname`, with its captured parameters.
    pub async fn match_route(
        &self,
        pathname: &str,
    ) -> RenderResult<Option<(&RouteConfig, PathParams)>> {
        let routes = self.path_config().await?;
        Ok(routes
            .iter()
            .find_map(|route| match_path(&route.path, pathname).map(|params| (route, params))))
    }

    /// Render every non-skipped component of `input`.
    ///
    /// Returns `None` when no route matches the pathname.
    pub async fn render_entries(&self, input: &Input) -> RenderResult<Option<EntriesMap>> {
        let pathname = input.pathname();
        let Some((_, params)) = self.match_route(pathname).await? else {
            tracing::debug!(pathname = %pathname, "No route matched");
            return Ok(None);
        };

        let skip = input.skip_ids();
        let props = RouteProps {
            path: pathname.to_string(),
            search_params: input.search_params().clone(),
            params,
        };

        let renders = component_ids(pathname)
            .into_iter()
            .filter(|id| !skip.contains(id))
            .map(|id| self.render_component(id, &props));
        let rendered = try_join_all(renders).await?;

        let mut entries: EntriesMap = rendered.into_iter().flatten().collect();
        if !skip.iter().any(ComponentId::is_should_skip) {
            // Read only after every render above has settled.
            entries.insert(ComponentId::should_skip(), self.should_skip_node()?);
        }

        metrics::record_entries(entries.len());
        tracing::debug!(
            pathname = %pathname,
            entries = entries.len(),
            skipped = skip.len(),
            "Rendered entries"
        );
        Ok(Some(entries))
    }

    async fn render_component(
        &self,
        id: ComponentId,
        props: &RouteProps,
    ) -> RenderResult<Option<(ComponentId, Node)>> {
        let setter = self.should_skip.setter(id.clone());
        let Some(component) = self.loader.load(&id, setter).await?.into_component() else {
            return Ok(None);
        };
        let node = component.render(props, Node::Children).await?;
        Ok(Some((id, node)))
    }

    fn should_skip_node(&self) -> RenderResult<Node> {
        let snapshot = serde_json::to_string(&self.should_skip.snapshot())?;
        Ok(Node::element("meta")
            .with_prop("name", SHOULD_SKIP_META)
            .with_prop("content", snapshot))
    }

    /// Enumerate routes for a static build.
    pub async fn get_build_config(
        &self,
        collector: &dyn ClientModuleCollector,
    ) -> RenderResult<Vec<BuildConfigEntry>> {
        build_config(self.path_config().await?, collector).await
    }

    /// The nested slot tree for rendering `pathname` as a full document.
    ///
    /// Returns `None` when no route matches the pathname.
    pub async fn get_ssr_config(&self, pathname: &str) -> RenderResult<Option<SsrConfig>> {
        if self.match_route(pathname).await?.is_none() {
            return Ok(None);
        }
        let input = input_string(pathname)?;
        let tree = component_ids(pathname)
            .into_iter()
            .rev()
            .fold(None, |acc, id| Some(Node::slot(id, acc)));
        let body = Node::fragment(vec![
            Node::slot(ComponentId::should_skip(), None),
            tree.unwrap_or(Node::Null),
        ]);
        Ok(Some(SsrConfig { input, body }))
    }
}
