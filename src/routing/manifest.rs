//! Client-module collection from a build manifest.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use async_trait::async_trait;

use crate::render::RenderResult;
use crate::routing::build::ClientModuleCollector;
use crate::routing::component_id::{component_ids, ComponentId};
use crate::routing::input::Input;

/// Collects client modules from a `component id -> [module id]` manifest.
///
/// An input needs the modules of every component along its pathname,
/// outermost first, without duplicates.
#[derive(Debug, Clone, Default)]
pub struct ManifestCollector {
    modules: BTreeMap<ComponentId, Vec<String>>,
}

impl ManifestCollector {
    pub fn new(modules: BTreeMap<ComponentId, Vec<String>>) -> Self {
        Self { modules }
    }

    /// Load a JSON manifest.
    pub fn load_from_file(path: &Path) -> std::io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let modules: BTreeMap<ComponentId, Vec<String>> = serde_json::from_reader(reader)?;
        tracing::info!(components = modules.len(), "Loaded client manifest");
        Ok(Self { modules })
    }

    /// Modules needed to render `pathname`.
    pub fn modules_for(&self, pathname: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for id in component_ids(pathname) {
            for module in self.modules.get(&id).into_iter().flatten() {
                if !out.contains(module) {
                    out.push(module.clone());
                }
            }
        }
        out
    }
}

#[async_trait]
impl ClientModuleCollector for ManifestCollector {
    async fn collect(&self, input: &str) -> RenderResult<Vec<String>> {
        Ok(self.modules_for(Input::parse(input).pathname()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collector() -> ManifestCollector {
        let mut modules = BTreeMap::new();
        modules.insert(ComponentId::from("layout"), vec!["/nav.js".to_string()]);
        modules.insert(
            ComponentId::from("a/page"),
            vec!["/counter.js".to_string(), "/nav.js".to_string()],
        );
        ManifestCollector::new(modules)
    }

    #[tokio::test]
    async fn test_collect_dedups_in_order() {
        let modules = collector().collect("a").await.unwrap();
        assert_eq!(modules, vec!["/nav.js", "/counter.js"]);
    }

    #[tokio::test]
    async fn test_collect_root() {
        assert_eq!(collector().collect("").await.unwrap(), vec!["/nav.js"]);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("rsc-router-manifest-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"layout":["/a.js"]}"#).unwrap();
        let loaded = ManifestCollector::load_from_file(&path).unwrap();
        assert_eq!(loaded.modules_for("/x"), vec!["/a.js"]);
        std::fs::remove_file(&path).unwrap_or_default();
    }
}
