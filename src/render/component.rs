//! Component loading and rendering seams.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::render::node::Node;
use crate::render::RenderError;
use crate::routing::component_id::ComponentId;
use crate::routing::input::SearchParams;
use crate::routing::matcher::PathParams;
use crate::routing::should_skip::SkipSetter;

/// Props injected into every route component.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteProps {
    pub path: String,
    pub search_params: SearchParams,
    pub params: PathParams,
}

/// A renderable layout or page.
#[async_trait]
pub trait Component: Send + Sync {
    /// Render with route props; `children` stands in for the nested child.
    async fn render(&self, props: &RouteProps, children: Node) -> Result<Node, RenderError>;
}

/// What a loader produced for a component id.
pub enum LoadedComponent {
    /// A module whose default export is the component.
    Default(Arc<dyn Component>),
    /// The component itself.
    Direct(Arc<dyn Component>),
    /// Nothing to render for this id.
    Absent,
}

impl LoadedComponent {
    pub fn into_component(self) -> Option<Arc<dyn Component>> {
        match self {
            LoadedComponent::Default(c) | LoadedComponent::Direct(c) => Some(c),
            LoadedComponent::Absent => None,
        }
    }
}

/// Resolves component ids to implementations.
///
/// The loader receives a `SkipSetter` scoped to `id` through which the
/// component may update its should-skip marker.
#[async_trait]
pub trait ComponentLoader: Send + Sync {
    async fn load(
        &self,
        id: &ComponentId,
        should_skip: SkipSetter,
    ) -> Result<LoadedComponent, RenderError>;
}

/// A component rendering a fixed tree with its child placeholder filled in.
#[derive(Debug, Clone)]
pub struct StaticComponent {
    node: Node,
}

impl StaticComponent {
    pub fn new(node: Node) -> Self {
        Self { node }
    }
}

#[async_trait]
impl Component for StaticComponent {
    async fn render(&self, _props: &RouteProps, children: Node) -> Result<Node, RenderError> {
        Ok(self.node.fill_children(&children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_component_keeps_placeholder() {
        let component = StaticComponent::new(Node::element("div").with_child(Node::Children));
        let props = RouteProps {
            path: "/".into(),
            search_params: SearchParams::new(),
            params: PathParams::new(),
        };
        let node = component.render(&props, Node::Children).await.unwrap();
        assert_eq!(node, Node::element("div").with_child(Node::Children));
    }

    #[test]
    fn test_loaded_shapes() {
        let c: Arc<dyn Component> = Arc::new(StaticComponent::new(Node::Null));
        assert!(LoadedComponent::Default(c.clone()).into_component().is_some());
        assert!(LoadedComponent::Direct(c).into_component().is_some());
        assert!(LoadedComponent::Absent.into_component().is_none());
    }
}
