//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::schema::{AppConfig, RouteEntry};
use crate::config::validation::{validate_config, ValidationError};
use crate::render::RenderResult;
use crate::routing::matcher::{PathSpec, PathSpecError};
use crate::routing::router::{PathConfigProvider, RouteConfig};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Convert route entries to route configs, preserving order.
pub fn route_configs(entries: &[RouteEntry]) -> Result<Vec<RouteConfig>, PathSpecError> {
    entries
        .iter()
        .map(|entry| Ok(RouteConfig::new(PathSpec::parse(&entry.path)?, entry.is_static)))
        .collect()
}

/// Path config backed by the `[[routes]]` table.
#[derive(Debug, Clone)]
pub struct ConfigPathProvider {
    routes: Vec<RouteConfig>,
}

impl ConfigPathProvider {
    pub fn new(config: &AppConfig) -> Result<Self, PathSpecError> {
        Ok(Self {
            routes: route_configs(&config.routes)?,
        })
    }
}

#[async_trait]
impl PathConfigProvider for ConfigPathProvider {
    async fn path_config(&self) -> RenderResult<Vec<RouteConfig>> {
        Ok(self.routes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_config() {
        let config = parse_config(
            r#"
            [[routes]]
            path = "/posts/[slug]"
            "#,
        )
        .unwrap();
        let provider = ConfigPathProvider::new(&config).unwrap();
        assert_eq!(provider.routes.len(), 1);
        assert!(!provider.routes[0].path.is_literal());
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("routes = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validation_errors_reported() {
        let err = parse_config(
            r#"
            [server]
            base_path = "app"

            [[routes]]
            path = "/[...a]/b"
            "#,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Path::new("/nonexistent/rsc-router.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
