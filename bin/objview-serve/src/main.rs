//! objview Serve - viewer HTTP server
//!
//! Serves the viewer pages, `data_files.json` and the OBJ files it lists.

use anyhow::Result;
use clap::Parser;
use objview_common::ServeConfig;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "objview-serve")]
#[command(about = "objview OBJ viewer server")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "objview.toml")]
    config: String,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Directory holding the pages, manifest and scripts
    #[arg(long)]
    root: Option<PathBuf>,

    /// Serve the comparison page without checking the manifest
    #[arg(long, default_value_t = false)]
    no_validate: bool,

    /// Log level (default: the config file's, else info)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// Overlay the command line on the config file (CLI takes precedence)
    fn merge(&self, mut config: ServeConfig) -> ServeConfig {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(root) = &self.root {
            config.server.root.clone_from(root);
        }
        if self.no_validate {
            config.server.validate_comparison = false;
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load config file if it exists
    let config = ServeConfig::load(Path::new(&args.config)).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to parse config file: {e}");
        ServeConfig::default()
    });

    let config = args.merge(config);
    let server = config.server;
    let log_level = config.logging.level;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting objview server");
    info!("Config file: {}", args.config);
    info!("Server root: {}", server.root.display());
    info!("Manifest: {}", server.manifest_path().display());
    if server.validate_comparison {
        info!("Comparison view requires two equally sized datasets");
    } else {
        warn!("Comparison manifest validation is DISABLED");
    }

    let addr: SocketAddr = server
        .listen_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid listen address {}: {}", server.listen_addr(), e))?;

    let app = objview_server::router(server);

    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutting down...");
    })
    .await?;

    info!("Server shut down gracefully");

    Ok(())
}
