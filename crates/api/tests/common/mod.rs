#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use signage_core::pdf::{PageRasterizer, PdfError};
use signage_store::StorageLayout;
use tempfile::TempDir;
use tower::ServiceExt;

use signage_api::config::ServerConfig;
use signage_api::router::build_app_router;
use signage_api::state::AppState;

/// PNG signature written by [`FakeRasterizer`].
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake page";

const BOUNDARY: &str = "signage-test-boundary";

/// Rasterizer that writes a fixed PNG without running poppler.
pub struct FakeRasterizer;

#[async_trait]
impl PageRasterizer for FakeRasterizer {
    async fn rasterize_first_page(
        &self,
        _pdf_path: &Path,
        output_path: &Path,
    ) -> Result<PathBuf, PdfError> {
        tokio::fs::write(output_path, FAKE_PNG).await?;
        Ok(output_path.to_path_buf())
    }
}

/// Rasterizer that always fails, as when poppler is not installed.
pub struct FailingRasterizer;

#[async_trait]
impl PageRasterizer for FailingRasterizer {
    async fn rasterize_first_page(
        &self,
        _pdf_path: &Path,
        _output_path: &Path,
    ) -> Result<PathBuf, PdfError> {
        Err(PdfError::ExecutionFailed {
            exit_code: Some(127),
            stderr: "pdftoppm: command not found".into(),
        })
    }
}

/// The application router over a throwaway data directory.
///
/// The directory lives as long as the `TestApp`.
pub struct TestApp {
    router: Router,
    pub layout: StorageLayout,
    _dir: TempDir,
}

impl TestApp {
    /// A fresh router sharing this app's state.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn data_dir(&self) -> &Path {
        &self.layout.data_dir
    }
}

/// Build a test `ServerConfig` rooted at `dir`.
///
/// Any CORS origin, a 30-second request timeout and no frontend build.
pub fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        data_dir: dir.to_path_buf(),
        static_dir: dir.join("static"),
        frontend_dist: dir.join("frontend-dist-missing"),
        pdf_rasterizer: "pdftoppm".to_string(),
        pdf_timeout_secs: 5,
    }
}

/// Build the full application router with [`FakeRasterizer`].
pub async fn build_test_app() -> TestApp {
    build_test_app_with(Arc::new(FakeRasterizer)).await
}

/// Build the full application router with the given rasterizer.
///
/// Uses the same `build_app_router` as `main.rs`, so tests exercise the
/// production middleware stack.
pub async fn build_test_app_with(rasterizer: Arc<dyn PageRasterizer>) -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(dir.path());
    let layout = StorageLayout::new(&config.data_dir, &config.static_dir);
    layout.ensure_dirs().await.expect("ensure dirs");

    let state = AppState::new(config.clone(), layout.clone(), rasterizer);
    TestApp {
        router: build_app_router(state, &config),
        layout,
        _dir: dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request failed")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    send(app, request).await
}

/// PUT without a body.
pub async fn put(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    send(app, request).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: &Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    send(app, request).await
}

pub async fn put_json(app: Router, uri: &str, body: &Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn patch_json(app: Router, uri: &str, body: &Value) -> Response<Body> {
    send_json(app, Method::PATCH, uri, body).await
}

/// POST a multipart form with a single file field.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    field: &str,
    filename: &str,
    content_type: &str,
    data: &[u8],
) -> Response<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request");
    send(app, request).await
}

/// Upload an asset through `/api/upload` and return the created file view.
pub async fn upload_asset(app: &TestApp, filename: &str, content_type: &str, data: &[u8]) -> Value {
    let response = post_multipart(app.router(), "/api/upload", "file", filename, content_type, data).await;
    assert_eq!(response.status(), 200, "upload of {filename} failed");
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    json["file"].clone()
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

/// Names of the regular files directly inside `dir`.
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.path().is_file())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
