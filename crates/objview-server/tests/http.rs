//! Router tests driven through `tower::ServiceExt::oneshot`

use axum::Router;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use objview_common::ServerConfig;
use objview_server::router;
use std::net::SocketAddr;
use std::path::Path;
use tempfile::{TempDir, tempdir};
use tower::ServiceExt;

fn app(root: &Path) -> Router {
    router(ServerConfig {
        root: root.to_path_buf(),
        ..ServerConfig::default()
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

fn site() -> TempDir {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>index</h1>").unwrap();
    std::fs::write(dir.path().join("atlas.html"), "<h1>atlas</h1>").unwrap();
    std::fs::write(dir.path().join("compare.html"), "<h1>compare</h1>").unwrap();
    dir
}

fn write_manifest(root: &Path, json: &str) {
    std::fs::write(root.join("data_files.json"), json).unwrap();
}

fn assert_no_cache(headers: &axum::http::HeaderMap) {
    assert_eq!(
        headers[header::CACHE_CONTROL],
        "no-store, no-cache, must-revalidate, max-age=0"
    );
    assert_eq!(headers[header::PRAGMA], "no-cache");
    assert_eq!(headers[header::EXPIRES], "0");
}

#[tokio::test]
async fn test_pages() {
    let dir = site();
    let (status, _, body) = get(app(dir.path()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>index</h1>");

    let (status, _, body) = get(app(dir.path()), "/atlas").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>atlas</h1>");

    let empty = tempdir().unwrap();
    let (status, _, _) = get(app(empty.path()), "/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let dir = tempdir().unwrap();
    let (status, _, body) = get(app(dir.path()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"healthy"}"#);
}

#[tokio::test]
async fn test_manifest_fetch() {
    let dir = site();
    write_manifest(dir.path(), r#"{"orig": ["A/a1.obj"], "pred": ["B/b1.obj"]}"#);

    let (status, headers, body) = get(app(dir.path()), "/data").await;
    assert_eq!(status, StatusCode::OK);
    assert_no_cache(&headers);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["orig"][0], "A/a1.obj");
    assert_eq!(value["pred"][0], "B/b1.obj");
}

#[tokio::test]
async fn test_manifest_fetch_is_not_cached() {
    let dir = site();
    let app = app(dir.path());
    write_manifest(dir.path(), r#"{"a": ["1.obj"]}"#);
    let (_, _, first) = get(app.clone(), "/data").await;

    write_manifest(dir.path(), r#"{"a": ["2.obj"]}"#);
    let (_, _, second) = get(app, "/data").await;
    assert_ne!(first, second);
    assert!(second.contains("2.obj"));
}

#[tokio::test]
async fn test_manifest_missing() {
    let dir = site();
    let (status, _, body) = get(app(dir.path()), "/data").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("not found"));
    assert_eq!(body, "data_files.json not found on server.");
}

#[tokio::test]
async fn test_manifest_invalid() {
    let dir = site();
    write_manifest(dir.path(), "{\"a\": [");
    let (status, _, body) = get(app(dir.path()), "/data").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "data_files.json is invalid.");
}

#[tokio::test]
async fn test_status_tracks_manifest_requests() {
    let dir = site();
    write_manifest(dir.path(), r#"{"a": []}"#);
    let client: SocketAddr = "10.1.2.3:40000".parse().unwrap();
    let app = app(dir.path()).layer(MockConnectInfo(client));

    let (status, headers, body) = get(app.clone(), "/data/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_no_cache(&headers);
    let before: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(before["count"], 0);
    assert!(before["last_request_time"].is_null());
    assert!(before["last_request_ip"].is_null());

    get(app.clone(), "/data").await;
    // failed fetches are still counted
    std::fs::remove_file(dir.path().join("data_files.json")).unwrap();
    get(app.clone(), "/data").await;

    let (_, _, body) = get(app, "/data/status").await;
    let after: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(after["count"], 2);
    assert_eq!(after["last_request_ip"], "10.1.2.3");
    assert!(after["last_request_time"].is_string());
}

#[tokio::test]
async fn test_raw_manifest() {
    let dir = site();
    let (status, _, body) = get(app(dir.path()), "/data_files.json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "data_files.json not found on server.");

    write_manifest(dir.path(), r#"{"a": ["x.obj"]}"#);
    let (status, headers, body) = get(app(dir.path()), "/data_files.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_no_cache(&headers);
    assert_eq!(body, r#"{"a": ["x.obj"]}"#);
}

#[tokio::test]
async fn test_object_requires_path() {
    let dir = site();
    for uri in ["/object", "/object?path="] {
        let (status, _, body) = get(app(dir.path()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "File path is required.");
    }
}

#[tokio::test]
async fn test_object_relative_and_absolute() {
    let dir = site();
    std::fs::create_dir_all(dir.path().join("A/sub")).unwrap();
    std::fs::write(dir.path().join("A/sub/a1.obj"), "v 1 2 3\n").unwrap();
    std::fs::write(dir.path().join("top.obj"), "v 0 0 0\n").unwrap();

    let (status, _, body) = get(app(dir.path()), "/object?path=A//sub/./a1.obj").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "v 1 2 3\n");

    let (status, _, body) = get(app(dir.path()), "/object?path=top.obj").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "v 0 0 0\n");

    // absolute paths bypass the server root entirely
    let elsewhere = tempdir().unwrap();
    let model = elsewhere.path().join("m.obj");
    std::fs::write(&model, "v 9 9 9\n").unwrap();
    let uri = format!("/object?path={}", model.display());
    let (status, _, body) = get(app(dir.path()), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "v 9 9 9\n");
}

#[tokio::test]
async fn test_object_repeated_path_uses_first() {
    let dir = site();
    std::fs::write(dir.path().join("top.obj"), "v 0 0 0\n").unwrap();

    for uri in [
        "/object?path=top.obj&path=top.obj",
        "/object?path=top.obj&path=missing.obj",
        "/object?other=1&path=top.obj",
    ] {
        let (status, _, body) = get(app(dir.path()), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body, "v 0 0 0\n");
    }

    // an empty first value is still a missing path
    let (status, _, body) = get(app(dir.path()), "/object?path=&path=top.obj").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "File path is required.");
}

#[tokio::test]
async fn test_object_not_found() {
    let dir = site();
    std::fs::create_dir_all(dir.path().join("A")).unwrap();
    for uri in ["/object?path=missing.obj", "/object?path=A", "/object?path=.."] {
        let (status, _, body) = get(app(dir.path()), uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, "File not found.");
    }
}

#[tokio::test]
async fn test_scripts() {
    let dir = site();
    std::fs::create_dir_all(dir.path().join("js/lib")).unwrap();
    std::fs::write(dir.path().join("js/lib/viewer.js"), "console.log(1);").unwrap();

    let (status, _, body) = get(app(dir.path()), "/js/lib/viewer.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "console.log(1);");

    let (status, _, _) = get(app(dir.path()), "/js/missing.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_compare_valid() {
    let dir = site();
    write_manifest(dir.path(), r#"{"gt": ["a.obj", "b.obj"], "pred": ["c.obj", "d.obj"]}"#);
    let (status, _, body) = get(app(dir.path()), "/compare").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>compare</h1>");
}

#[tokio::test]
async fn test_compare_unequal_lengths() {
    let dir = site();
    write_manifest(dir.path(), r#"{"a": [1, 2], "b": [1, 2, 3]}"#);
    let (status, headers, body) = get(app(dir.path()), "/compare").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    assert!(body.contains("&#x27;a&#x27; has 2"));
    assert!(body.contains("&#x27;b&#x27; has 3"));
}

#[tokio::test]
async fn test_compare_uses_error_template_and_escapes() {
    let dir = site();
    std::fs::write(dir.path().join("error.html"), "<main>{{ error }}</main>").unwrap();
    write_manifest(dir.path(), r#"{"<script>": [], "b": [], "c": []}"#);

    let (status, _, body) = get(app(dir.path()), "/compare").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with("<main>"));
    assert!(body.contains("&lt;script&gt;"));
    assert!(!body.contains("<script>"));
}

#[tokio::test]
async fn test_compare_missing_manifest() {
    let dir = site();
    let (status, _, body) = get(app(dir.path()), "/compare").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("not found"));
}

#[tokio::test]
async fn test_compare_without_validation() {
    let dir = site();
    write_manifest(dir.path(), r#"{"only": []}"#);
    let app = router(ServerConfig {
        root: dir.path().to_path_buf(),
        validate_comparison: false,
        ..ServerConfig::default()
    });
    let (status, _, body) = get(app, "/compare").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>compare</h1>");
}
