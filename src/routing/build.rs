//! Build-time route enumeration.
//!
//! Every route yields one `BuildConfigEntry`. Only all-literal routes can be
//! pre-rendered, so only they get `entries` and a slot in the prefetch map
//! (`pathname -> client module ids`) embedded in the shared prefetch script.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::render::RenderResult;
use crate::routing::input::input_string;
use crate::routing::matcher::PathSpec;
use crate::routing::router::RouteConfig;

/// Global installed by the prefetch script.
pub const PREFETCH_GLOBAL: &str = "__RSC_ROUTER_PREFETCH__";

/// Reports the client modules needed to render an input.
#[async_trait]
pub trait ClientModuleCollector: Send + Sync {
    async fn collect(&self, input: &str) -> RenderResult<Vec<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildEntry {
    pub input: String,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfigEntry {
    pub pathname: PathSpec,
    pub is_static: bool,
    pub entries: Vec<BuildEntry>,
    pub custom_code: String,
}

/// Script installing `globalThis.__RSC_ROUTER_PREFETCH__(path)`.
pub fn prefetch_script(path2ids: &BTreeMap<String, Vec<String>>) -> RenderResult<String> {
    let map = serde_json::to_string(path2ids)?;
    Ok(format!(
        r#"
globalThis.{PREFETCH_GLOBAL} = (path) => {{
  const path2ids = {map};
  for (const id of path2ids[path] || []) {{
    import(id);
  }}
}};"#
    ))
}

/// Enumerate `routes`, collecting client modules for every literal route.
pub async fn build_config(
    routes: &[RouteConfig],
    collector: &dyn ClientModuleCollector,
) -> RenderResult<Vec<BuildConfigEntry>> {
    let mut path2ids = BTreeMap::new();
    for route in routes {
        let Some(pathname) = route.path.literal_pathname() else {
            continue;
        };
        let input = input_string(&pathname)?;
        let module_ids = collector.collect(&input).await?;
        tracing::debug!(pathname = %pathname, modules = module_ids.len(), "Collected client modules");
        path2ids.insert(pathname, module_ids);
    }
    let custom_code = prefetch_script(&path2ids)?;

    routes
        .iter()
        .map(|route| -> RenderResult<BuildConfigEntry> {
            let entries = match route.path.literal_pathname() {
                Some(pathname) => vec![BuildEntry {
                    input: input_string(&pathname)?,
                    is_static: route.is_static,
                }],
                None => Vec::new(),
            };
            Ok(BuildConfigEntry {
                pathname: route.path.clone(),
                is_static: route.is_static,
                entries,
                custom_code: custom_code.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCollector {
        inputs: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ClientModuleCollector for RecordingCollector {
        async fn collect(&self, input: &str) -> RenderResult<Vec<String>> {
            self.inputs.lock().unwrap().push(input.to_string());
            Ok(vec![format!("/assets/{}.js", input.replace('/', "-"))])
        }
    }

    fn routes() -> Vec<RouteConfig> {
        [("/a/b", true), ("/a/[id]", false), ("/[...rest]", true)]
            .into_iter()
            .map(|(p, s)| RouteConfig::new(PathSpec::parse(p).unwrap(), s))
            .collect()
    }

    #[tokio::test]
    async fn test_only_literal_routes_get_entries() {
        let collector = RecordingCollector::default();
        let config = build_config(&routes(), &collector).await.unwrap();

        assert_eq!(config.len(), 3);
        let with_entries: Vec<_> = config.iter().filter(|c| !c.entries.is_empty()).collect();
        assert_eq!(with_entries.len(), 1);
        assert_eq!(with_entries[0].pathname.to_string(), "/a/b");
        assert_eq!(
            with_entries[0].entries,
            vec![BuildEntry { input: "a/b".into(), is_static: true }]
        );
        assert_eq!(*collector.inputs.lock().unwrap(), vec!["a/b".to_string()]);
    }

    #[tokio::test]
    async fn test_custom_code_shared_and_embeds_map() {
        let config = build_config(&routes(), &RecordingCollector::default()).await.unwrap();
        let code = &config[0].custom_code;
        assert!(config.iter().all(|c| &c.custom_code == code));
        assert!(code.contains("globalThis.__RSC_ROUTER_PREFETCH__ = (path) => {"));
        assert!(code.contains(r#"const path2ids = {"/a/b":["/assets/a-b.js"]};"#));
    }

    #[tokio::test]
    async fn test_root_route_input_is_empty() {
        let routes = vec![RouteConfig::new(PathSpec::parse("/").unwrap(), false)];
        let collector = RecordingCollector::default();
        let config = build_config(&routes, &collector).await.unwrap();
        assert_eq!(config[0].entries[0].input, "");
        assert!(config[0].custom_code.contains(r#"{"/":["/assets/.js"]}"#));
    }

    #[test]
    fn test_serialized_entry_shape() {
        let entry = BuildConfigEntry {
            pathname: PathSpec::parse("/x").unwrap(),
            is_static: true,
            entries: vec![],
            custom_code: String::new(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["isStatic"], serde_json::json!(true));
        assert_eq!(json["customCode"], serde_json::json!(""));
        assert_eq!(json["pathname"][0]["type"], serde_json::json!("literal"));
    }
}
