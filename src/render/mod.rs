//! Rendering subsystem.
//!
//! # Data Flow
//! ```text
//! Partial render (RSC):
//!     ComponentLoader (id → component)
//!     → Component::render (props + child placeholder → Node)
//!     → EntriesMap (ordered id → Node)
//!     → EntriesEncoder (wire stream)
//!
//! Full document (SSR):
//!     SsrConfig slot tree + EntriesMap
//!     → html.rs (slot resolution → markup)
//!     → document.rs (template injection)
//! ```
//!
//! # Design Decisions
//! - Loader and renderer are trait seams; the crate ships filesystem-backed
//!   implementations for the binary
//! - Nodes are plain serde data, rendered eagerly per request

pub mod component;
pub mod document;
pub mod encoder;
pub mod entries;
pub mod fs_loader;
pub mod html;
pub mod node;

use thiserror::Error;

use crate::routing::component_id::ComponentId;
use crate::routing::input::InputError;

pub use component::{Component, ComponentLoader, LoadedComponent, RouteProps, StaticComponent};
pub use entries::EntriesMap;
pub use node::Node;

/// Errors raised while resolving routes or rendering components.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load component '{id}': {message}")]
    Load { id: ComponentId, message: String },

    #[error("component '{id}' failed to render: {message}")]
    Component { id: ComponentId, message: String },

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
