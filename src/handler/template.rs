//! Full-document HTML templates.
//!
//! # Design Decisions
//! - The root template (`/`) is loaded once and kept for the handler's lifetime
//! - A pathname without its own template falls back to the root template
//! - Only "not found" falls back; any other load failure is an error

use std::io::ErrorKind;
use std::path::{Component as PathComponent, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::routing::matcher::split_segments;

/// Errors raised while loading templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("no template for '{0}'")]
    NotFound(String),

    #[error("failed to read template for '{pathname}': {source}")]
    Io {
        pathname: String,
        #[source]
        source: std::io::Error,
    },
}

/// Loads the HTML template for a pathname.
#[async_trait]
pub trait TemplateLoader: Send + Sync {
    async fn load(&self, pathname: &str) -> Result<String, TemplateError>;
}

/// Reads `<root>/<pathname>/index.html`.
#[derive(Debug, Clone)]
pub struct FsTemplateLoader {
    root: PathBuf,
}

impl FsTemplateLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TemplateLoader for FsTemplateLoader {
    async fn load(&self, pathname: &str) -> Result<String, TemplateError> {
        let mut path = self.root.clone();
        for segment in split_segments(pathname) {
            let is_normal = PathBuf::from(segment)
                .components()
                .all(|c| matches!(c, PathComponent::Normal(_)));
            if !is_normal {
                return Err(TemplateError::NotFound(pathname.to_string()));
            }
            path.push(segment);
        }
        path.push("index.html");

        tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                TemplateError::NotFound(pathname.to_string())
            } else {
                TemplateError::Io {
                    pathname: pathname.to_string(),
                    source: e,
                }
            }
        })
    }
}

/// Caches loaded templates and applies the root fallback.
pub struct TemplateCache {
    loader: Arc<dyn TemplateLoader>,
    root: OnceCell<String>,
    templates: DashMap<String, String>,
}

impl TemplateCache {
    pub fn new(loader: Arc<dyn TemplateLoader>) -> Self {
        Self {
            loader,
            root: OnceCell::new(),
            templates: DashMap::new(),
        }
    }

    /// Template for `pathname`, falling back to the root template.
    pub async fn get(&self, pathname: &str) -> Result<String, TemplateError> {
        if let Some(hit) = self.templates.get(pathname) {
            return Ok(hit.value().clone());
        }

        let root = self
            .root
            .get_or_try_init(|| self.loader.load("/"))
            .await?;

        match self.loader.load(pathname).await {
            Ok(template) => {
                self.templates.insert(pathname.to_string(), template.clone());
                Ok(template)
            }
            Err(TemplateError::NotFound(_)) => {
                tracing::debug!(pathname = %pathname, "No dedicated template, using root");
                Ok(root.clone())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLoader {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TemplateLoader for CountingLoader {
        async fn load(&self, pathname: &str) -> Result<String, TemplateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match pathname {
                "/" => Ok("root".into()),
                "/about" => Ok("about".into()),
                "/broken" => Err(TemplateError::Io {
                    pathname: pathname.into(),
                    source: std::io::Error::new(ErrorKind::PermissionDenied, "denied"),
                }),
                other => Err(TemplateError::NotFound(other.into())),
            }
        }
    }

    #[tokio::test]
    async fn test_fallback_and_caching() {
        let loader = Arc::new(CountingLoader { calls: AtomicUsize::new(0) });
        let cache = TemplateCache::new(loader.clone());

        assert_eq!(cache.get("/about").await.unwrap(), "about");
        assert_eq!(cache.get("/missing").await.unwrap(), "root");
        let calls = loader.calls.load(Ordering::SeqCst);

        // Cached hit does not reach the loader
        assert_eq!(cache.get("/about").await.unwrap(), "about");
        assert_eq!(loader.calls.load(Ordering::SeqCst), calls);
    }

    #[tokio::test]
    async fn test_io_errors_do_not_fall_back() {
        let cache = TemplateCache::new(Arc::new(CountingLoader { calls: AtomicUsize::new(0) }));
        assert!(matches!(cache.get("/broken").await, Err(TemplateError::Io { .. })));
    }

    #[tokio::test]
    async fn test_fs_loader() {
        let dir = std::env::temp_dir().join(format!("rsc-router-templates-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("about")).unwrap();
        std::fs::write(dir.join("index.html"), "<html>root</html>").unwrap();
        std::fs::write(dir.join("about/index.html"), "<html>about</html>").unwrap();

        let loader = FsTemplateLoader::new(&dir);
        assert_eq!(loader.load("/").await.unwrap(), "<html>root</html>");
        assert_eq!(loader.load("/about").await.unwrap(), "<html>about</html>");
        assert!(matches!(loader.load("/nope").await, Err(TemplateError::NotFound(_))));
        assert!(matches!(loader.load("/../etc").await, Err(TemplateError::NotFound(_))));

        std::fs::remove_dir_all(&dir).unwrap_or_default();
    }
}
