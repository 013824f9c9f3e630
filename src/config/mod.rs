//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → ConfigPathProvider feeds [[routes]] to the router
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, route_configs, ConfigError, ConfigPathProvider};
pub use schema::{
    AppConfig, ListenerConfig, ObservabilityConfig, RouteEntry, ServerConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
