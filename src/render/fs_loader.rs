//! Component loader backed by prebuilt JSON trees on disk.
//!
//! Component `a/b/layout` is read from `<dir>/a/b/layout.json`. A file holds
//! either the component directly or a module with a `default` export:
//!
//! ```json
//! { "shouldSkip": { "path": true }, "node": { "type": "element", "tag": "main" } }
//! { "default": { "node": { "type": "children" } } }
//! ```

use std::io::ErrorKind;
use std::path::{Component as PathComponent, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::render::component::{ComponentLoader, LoadedComponent, StaticComponent};
use crate::render::node::Node;
use crate::render::RenderError;
use crate::routing::component_id::ComponentId;
use crate::routing::should_skip::{SkipMarker, SkipSetter};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComponentFile {
    #[serde(default)]
    should_skip: Option<SkipMarker>,
    node: Node,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ComponentModule {
    Default { default: ComponentFile },
    Direct(ComponentFile),
}

/// Loads `StaticComponent`s from a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FsComponentLoader {
    root: PathBuf,
}

impl FsComponentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File path for `id`, or `None` if the id would escape the root.
    fn file_for(&self, id: &ComponentId) -> Option<PathBuf> {
        let relative = PathBuf::from(format!("{}.json", id.as_str()));
        let safe = relative
            .components()
            .all(|c| matches!(c, PathComponent::Normal(_)));
        safe.then(|| self.root.join(relative))
    }
}

#[async_trait]
impl ComponentLoader for FsComponentLoader {
    async fn load(
        &self,
        id: &ComponentId,
        should_skip: SkipSetter,
    ) -> Result<LoadedComponent, RenderError> {
        let Some(path) = self.file_for(id) else {
            tracing::warn!(component = %id, "Rejected component id outside component root");
            return Ok(LoadedComponent::Absent);
        };

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LoadedComponent::Absent),
            Err(e) => {
                return Err(RenderError::Load {
                    id: id.clone(),
                    message: e.to_string(),
                })
            }
        };

        let module: ComponentModule =
            serde_json::from_str(&content).map_err(|e| RenderError::Load {
                id: id.clone(),
                message: e.to_string(),
            })?;

        let loaded = match module {
            ComponentModule::Default { default } => {
                should_skip.set(default.should_skip);
                LoadedComponent::Default(Arc::new(StaticComponent::new(default.node)))
            }
            ComponentModule::Direct(file) => {
                should_skip.set(file.should_skip);
                LoadedComponent::Direct(Arc::new(StaticComponent::new(file.node)))
            }
        };
        tracing::debug!(component = %id, path = ?path, "Loaded component");
        Ok(loaded)
    }
}
