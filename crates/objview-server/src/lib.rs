//! objview Server - HTTP front end for the OBJ viewer
//!
//! Serves the viewer pages, the dataset manifest and the model files it
//! references. The manifest is read from disk on every request so a rebuild
//! is visible immediately without restarting the server.

pub mod error;
pub mod handlers;
pub mod pages;
pub mod tracking;

use axum::Router;
use axum::routing::get;
use objview_common::ServerConfig;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

// Re-exports
pub use error::ServerError;
pub use tracking::{RequestTracker, TrackingSnapshot};

/// Application state shared across handlers
pub struct AppState {
    pub config: ServerConfig,
    pub tracker: RequestTracker,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            tracker: RequestTracker::new(),
        }
    }
}

/// Build the application router.
///
/// Client addresses are only known when the router is served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn router(config: ServerConfig) -> Router {
    let scripts = ServeDir::new(config.scripts_path());
    let raw_manifest_route = format!("/{}", config.manifest_file);
    let state = Arc::new(AppState::new(config));

    Router::new()
        .route("/health", get(handlers::health_check))
        // Viewer pages
        .route("/", get(handlers::index))
        .route("/atlas", get(handlers::atlas))
        .route("/compare", get(handlers::compare))
        // Manifest
        .route("/data", get(handlers::get_manifest))
        .route("/data/status", get(handlers::manifest_status))
        .route(&raw_manifest_route, get(handlers::raw_manifest))
        // Model files and script assets
        .route("/object", get(handlers::get_object))
        .nest_service("/js", scripts)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
