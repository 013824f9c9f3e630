//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate route patterns (wildcard placement, names)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::routing::matcher::{PathSpec, PathSpecError};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid bind address: {0}")]
    BindAddress(String),

    #[error("base_path must start and end with '/': {0}")]
    BasePath(String),

    #[error("rsc_path must be a single non-empty segment: {0}")]
    RscPath(String),

    #[error("invalid route {path}: {source}")]
    Route {
        path: String,
        source: PathSpecError,
    },

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("invalid metrics address: {0}")]
    MetricsAddress(String),
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    let base = &config.server.base_path;
    if !base.starts_with('/') || !base.ends_with('/') {
        errors.push(ValidationError::BasePath(base.clone()));
    }

    let rsc = &config.server.rsc_path;
    if rsc.is_empty() || rsc.contains('/') || rsc.contains('?') {
        errors.push(ValidationError::RscPath(rsc.clone()));
    }

    for entry in &config.routes {
        if let Err(source) = PathSpec::parse(&entry.path) {
            errors.push(ValidationError::Route {
                path: entry.path.clone(),
                source,
            });
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
