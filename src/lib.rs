//! File-based router for server-component apps.
//!
//! Resolves pathnames to layout/page component chains, renders them as
//! partial-render entry streams or full HTML documents, and enumerates
//! routes for static builds.

pub mod config;
pub mod handler;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod routing;

pub use config::schema::AppConfig;
pub use handler::{Handler, HandlerBuilder, HandlerError, Outcome, RequestContext};
pub use http::RscServer;
pub use lifecycle::Shutdown;
pub use routing::router::Router;
