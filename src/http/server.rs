//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router around the production handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve on a listener until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, middleware, Router};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::TimeoutConfig;
use crate::handler::Handler;
use crate::http::middleware::dispatch;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::lifecycle::Shutdown;

/// HTTP front end for a `Handler`.
pub struct RscServer {
    router: Router,
}

impl RscServer {
    pub fn new<C>(handler: Arc<Handler<C>>, timeouts: &TimeoutConfig) -> Self
    where
        C: Send + Sync + 'static,
    {
        Self {
            router: Self::build_router(handler, timeouts),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router<C>(handler: Arc<Handler<C>>, timeouts: &TimeoutConfig) -> Router
    where
        C: Send + Sync + 'static,
    {
        Router::new()
            .fallback(not_found)
            .layer(middleware::from_fn_with_state(handler, dispatch::<C>))
            .layer(TimeoutLayer::new(Duration::from_secs(timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut rx = shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = rx.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
