use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

use rsc_router::config::{load_config, AppConfig, ConfigPathProvider};
use rsc_router::render::fs_loader::FsComponentLoader;
use rsc_router::routing::component_ids;
use rsc_router::routing::manifest::ManifestCollector;
use rsc_router::Router;

#[derive(Parser)]
#[command(name = "rsc-cli")]
#[command(about = "Inspect and build rsc-router route tables", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "rsc-router.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the build config (routes, prerender inputs, prefetch script)
    BuildConfig {
        /// Client manifest overriding `server.client_manifest`
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },
    /// Print the component ids rendered for a pathname
    Ids { pathname: String },
    /// Print the route and params matched by a pathname
    Match { pathname: String },
}

fn router(config: &AppConfig) -> Result<Router, Box<dyn std::error::Error>> {
    let provider = ConfigPathProvider::new(config)?;
    let loader = FsComponentLoader::new(&config.server.components_dir);
    Ok(Router::new(Arc::new(provider), Arc::new(loader)))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ids { pathname } => {
            let ids = component_ids(&pathname);
            println!("{}", serde_json::to_string_pretty(&ids)?);
        }
        Commands::Match { pathname } => {
            let config = load_config(&cli.config)?;
            let router = router(&config)?;
            match router.match_route(&pathname).await? {
                Some((route, params)) => {
                    let out = json!({ "route": route, "params": params });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                None => {
                    eprintln!("No route matches {}", pathname);
                    std::process::exit(1);
                }
            }
        }
        Commands::BuildConfig { manifest } => {
            let config = load_config(&cli.config)?;
            let router = router(&config)?;
            let manifest = manifest.or_else(|| config.server.client_manifest.as_ref().map(PathBuf::from));
            let collector = match manifest {
                Some(path) => ManifestCollector::load_from_file(&path)?,
                None => ManifestCollector::default(),
            };
            let build = router.get_build_config(&collector).await?;
            println!("{}", serde_json::to_string_pretty(&build)?);
        }
    }

    Ok(())
}
