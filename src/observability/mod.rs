//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handler / router
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through tracing spans (tower-http layers)
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
