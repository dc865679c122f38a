//! HTTP handlers
//!
//! Pages and objects are served straight from disk with `tower-http`'s
//! `ServeFile`; the manifest is re-read on every request.

use crate::AppState;
use crate::error::ServerError;
use crate::pages::{self, ATLAS_PAGE, COMPARE_PAGE, INDEX_PAGE};
use axum::extract::connect_info::ConnectInfo;
use axum::extract::{Query, Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, RequestExt, body::Body};
use objview_common::path::normalize;
use objview_manifest::validate::{read_error, validate_comparison_str};
use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, error, info, warn};

type Result<T> = std::result::Result<T, ServerError>;

/// Health check (GET /health)
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "healthy" })))
}

/// Landing page (GET /)
pub async fn index(State(state): State<Arc<AppState>>, mut request: Request) -> Response {
    let client = client_ip(&mut request).await;
    info!("Serving {} to {}", INDEX_PAGE, display_ip(client));
    serve_file(&state.config.root.join(INDEX_PAGE), request).await
}

/// Single-dataset viewer (GET /atlas)
pub async fn atlas(State(state): State<Arc<AppState>>, mut request: Request) -> Response {
    let client = client_ip(&mut request).await;
    info!("Serving {} to {}", ATLAS_PAGE, display_ip(client));
    serve_file(&state.config.root.join(ATLAS_PAGE), request).await
}

/// Comparison viewer (GET /compare)
///
/// Served only when the manifest holds exactly two equally sized datasets;
/// otherwise a 400 error page explains what is wrong.
pub async fn compare(State(state): State<Arc<AppState>>, mut request: Request) -> Response {
    let client = client_ip(&mut request).await;

    if state.config.validate_comparison {
        let manifest_path = state.config.manifest_path();
        let checked = match tokio::fs::read_to_string(&manifest_path).await {
            Ok(contents) => validate_comparison_str(&manifest_path, &contents),
            Err(e) => Err(read_error(&manifest_path, &e)),
        };
        if let Err(e) = checked {
            warn!("Comparison view rejected for {}: {}", display_ip(client), e);
            return pages::error_page(&state.config.root, &e.to_string()).await;
        }
    }

    info!("Serving {} to {}", COMPARE_PAGE, display_ip(client));
    serve_file(&state.config.root.join(COMPARE_PAGE), request).await
}

/// Manifest as JSON (GET /data)
pub async fn get_manifest(
    State(state): State<Arc<AppState>>,
    mut request: Request,
) -> Result<Response> {
    let client = client_ip(&mut request).await;
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    info!("/data requested from {} - UA: {}", display_ip(client), user_agent);
    state.tracker.record(client);

    let name = state.config.manifest_file.clone();
    let contents = match tokio::fs::read(state.config.manifest_path()).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            error!("{} not found", name);
            return Err(ServerError::ManifestNotFound(name));
        }
        Err(e) => {
            error!("Failed to read {}: {}", name, e);
            return Err(ServerError::Internal(e.to_string()));
        }
    };

    let manifest: serde_json::Value = serde_json::from_slice(&contents).map_err(|e| {
        error!("Failed to parse {}: {}", name, e);
        ServerError::ManifestInvalid(name.clone())
    })?;

    Ok(no_cache(Json(manifest).into_response()))
}

/// Manifest request tracking (GET /data/status)
pub async fn manifest_status(State(state): State<Arc<AppState>>) -> Response {
    no_cache(Json(state.tracker.snapshot()).into_response())
}

/// Raw manifest download (GET /data_files.json)
pub async fn raw_manifest(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response> {
    let path = state.config.manifest_path();
    if !is_file(&path).await {
        error!("{} not found for direct serve", state.config.manifest_file);
        return Err(ServerError::ManifestFileNotFound(
            state.config.manifest_file.clone(),
        ));
    }
    Ok(no_cache(serve_file(&path, request).await))
}

/// Raw file bytes by path (GET /object?path=...)
///
/// Absolute paths are served as-is and relative ones are resolved against
/// the server root. There is no containment check: anything the process
/// can read is reachable. When `path` is repeated the first value wins.
pub async fn get_object(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
    request: Request,
) -> Result<Response> {
    let raw = params
        .into_iter()
        .find_map(|(key, value)| (key == "path").then_some(value))
        .filter(|p| !p.is_empty())
        .ok_or(ServerError::MissingPath)?;
    let normalized = normalize(Path::new(&raw));

    let target = if normalized.is_absolute() {
        normalized
    } else {
        let directory = normalized
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = normalized.file_name().ok_or(ServerError::FileNotFound)?;
        state.config.root.join(directory).join(file_name)
    };

    if !is_file(&target).await {
        debug!("Object not found: {}", target.display());
        return Err(ServerError::FileNotFound);
    }
    debug!("Serving object {}", target.display());
    Ok(serve_file(&target, request).await)
}

/// Serve a single file, letting `ServeFile` pick the content type
async fn serve_file(path: &Path, request: Request) -> Response {
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}

/// Add headers telling clients and intermediaries not to cache
fn no_cache(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, max-age=0"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    response
}

async fn client_ip(request: &mut Request) -> Option<IpAddr> {
    request
        .extract_parts::<ConnectInfo<SocketAddr>>()
        .await
        .ok()
        .map(|ConnectInfo(addr)| addr.ip())
}

fn display_ip(ip: Option<IpAddr>) -> String {
    ip.map_or_else(|| "unknown".to_string(), |ip| ip.to_string())
}
