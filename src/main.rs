//! rsc-router server.
//!
//! ```text
//!     Client Request
//!     ──▶ http server ──▶ dispatch ──▶ Handler ──┬─▶ SSR: template + rendered slot tree
//!                                                ├─▶ RSC: entries stream
//!                                                └─▶ declined: 404 fallback
//!
//!     Router ◀── ConfigPathProvider ([[routes]])
//!            ◀── FsComponentLoader (components_dir/<id>.json)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use rsc_router::config::{load_config, AppConfig, ConfigPathProvider};
use rsc_router::handler::{FsTemplateLoader, Handler};
use rsc_router::lifecycle::{shutdown_on_signal, Shutdown};
use rsc_router::observability::{logging, metrics};
use rsc_router::render::document::TemplateDocumentRenderer;
use rsc_router::render::fs_loader::FsComponentLoader;
use rsc_router::{Router, RscServer};

#[derive(Parser)]
#[command(name = "rsc-router")]
#[command(about = "Serve file-based server-component routes", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init_tracing(&config.observability.log_level);
    tracing::info!("rsc-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        ssr = config.server.ssr,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let provider = ConfigPathProvider::new(&config)?;
    let loader = FsComponentLoader::new(&config.server.components_dir);
    let router = Arc::new(Router::new(Arc::new(provider), Arc::new(loader)));

    let handler = Handler::<()>::builder(&config.server, router)
        .document(
            Arc::new(FsTemplateLoader::new(&config.server.templates_dir)),
            Arc::new(TemplateDocumentRenderer),
        )
        .build()?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_on_signal(shutdown.clone()));

    RscServer::new(Arc::new(handler), &config.timeouts)
        .run(listener, shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
