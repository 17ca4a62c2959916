//! HTTP server and routing integration tests

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use helpers::{multipart_text_request, response_json, test_settings};
use slidegate::{build_router, AppState};

fn test_app(dir: &TempDir) -> axum::Router {
    let state = AppState::new(test_settings(dir.path())).unwrap();
    build_router(state)
}

#[tokio::test]
async fn health_reports_module_and_version() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "slidegate");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_seconds"].is_u64());
    assert!(body.get("last_error").is_none());
}

#[tokio::test]
async fn upload_without_file_field_returns_structured_400() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(multipart_text_request("/upload", "note", "no file here"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(
        body,
        json!({"success": false, "message": "No file uploaded"})
    );
}

#[tokio::test]
async fn missing_converted_file_returns_404() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/converted/does-not-exist.pptx")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_uploaded_file_returns_404() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/uploads/does-not-exist.docx")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/no-such-route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn startup_creates_both_directories() {
    let dir = TempDir::new().unwrap();
    let state = AppState::new(test_settings(dir.path())).unwrap();

    assert!(state.store.uploads_dir().is_dir());
    assert!(state.store.converted_dir().is_dir());

    // Idempotent: a second startup over the same data dir succeeds
    let again = AppState::new(test_settings(dir.path())).unwrap();
    assert_eq!(again.store.uploads_dir(), state.store.uploads_dir());
}

#[tokio::test]
async fn health_body_is_valid_json_object() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body: Value = response_json(response).await;
    assert!(body.is_object());
}
