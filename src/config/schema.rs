//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the router server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Request handling and asset locations.
    pub server: ServerConfig,

    /// Route definitions, matched in order.
    pub routes: Vec<RouteEntry>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Handler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Public base path, with leading and trailing slash.
    pub base_path: String,

    /// Path segment under the base path serving partial renders.
    pub rsc_path: String,

    /// Serve full HTML documents for matched routes.
    pub ssr: bool,

    /// Directory holding one `<component id>.json` file per component.
    pub components_dir: String,

    /// Directory holding `<path>/index.html` templates.
    pub templates_dir: String,

    /// Optional JSON manifest of client modules per component id.
    pub client_manifest: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            rsc_path: "RSC".to_string(),
            ssr: true,
            components_dir: "dist/components".to_string(),
            templates_dir: "dist/public".to_string(),
            client_manifest: None,
        }
    }
}

/// One route pattern, e.g. `/posts/[slug]`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteEntry {
    /// Pattern using `[name]` for groups and `[...name]` for a trailing wildcard.
    pub path: String,

    /// Prerender at build time (only meaningful for literal patterns).
    #[serde(default)]
    pub is_static: bool,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.server.base_path, "/");
        assert_eq!(config.server.rsc_path, "RSC");
        assert!(config.server.ssr);
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_parse_routes() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            base_path = "/app/"
            ssr = false

            [[routes]]
            path = "/"
            is_static = true

            [[routes]]
            path = "/posts/[slug]"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.base_path, "/app/");
        assert!(!config.server.ssr);
        assert_eq!(config.routes.len(), 2);
        assert!(config.routes[0].is_static);
        assert!(!config.routes[1].is_static);
        assert_eq!(config.routes[1].path, "/posts/[slug]");
    }
}
