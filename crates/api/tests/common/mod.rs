#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use pdfdesk_core::clock::FixedClock;
use pdfdesk_core::storage::LocalBlobStore;
use pdfdesk_db::InMemoryPdfStore;
use pdfdesk_render::{HtmlPdfRenderer, LogoResolver};
use tempfile::TempDir;
use tower::ServiceExt;

use pdfdesk_api::config::ServerConfig;
use pdfdesk_api::router::build_app_router;
use pdfdesk_api::services::PdfService;
use pdfdesk_api::state::AppState;

pub const BASE_URL: &str = "http://localhost:3000";
const BOUNDARY: &str = "pdfdesk-test-boundary";

/// A router wired to an in-memory store and a temporary storage root.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryPdfStore>,
    /// Kept alive for the duration of the test.
    pub storage: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(storage: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        storage_root: storage.path().to_path_buf(),
        public_base_url: BASE_URL.to_string(),
        upload_body_limit_bytes: 32 * 1024 * 1024,
        logo_fetch_timeout_secs: 2,
        logo_max_bytes: 1024 * 1024,
    }
}

/// Build the full application router with all middleware layers.
///
/// Uses the same [`build_app_router`] as `main.rs`, with the in-memory store
/// standing in for PostgreSQL.
pub fn build_test_app() -> TestApp {
    let storage = tempfile::tempdir().expect("create temp storage root");
    let config = test_config(&storage);
    let store = Arc::new(InMemoryPdfStore::new());

    let logos = LogoResolver::new(
        Duration::from_secs(config.logo_fetch_timeout_secs),
        config.logo_max_bytes,
    )
    .unwrap();
    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 10, 16, 10, 0, 0).unwrap());

    let pdf_service = PdfService::new(
        store.clone(),
        Arc::new(LocalBlobStore::new(storage.path())),
        Arc::new(HtmlPdfRenderer),
        logos,
        Arc::new(clock),
        BASE_URL,
    );

    let state = AppState {
        config: Arc::new(config.clone()),
        store: store.clone(),
        pdf_service: Arc::new(pdf_service),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        storage,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw_json(app, uri, body.to_string()).await
}

pub async fn post_raw_json(app: Router, uri: &str, body: String) -> Response {
    app.oneshot(
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// One part of a multipart form.
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: Vec<u8>,
}

impl<'a> Part<'a> {
    /// A `file` part with the given client name and MIME type.
    pub fn file(filename: &'a str, content_type: &'a str, data: Vec<u8>) -> Self {
        Self {
            name: "file",
            filename: Some(filename),
            content_type: Some(content_type),
            data,
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(filename) = part.filename {
            disposition.push_str(&format!("; filename=\"{filename}\""));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(app: Router, uri: &str, parts: &[Part<'_>]) -> Response {
    app.oneshot(
        Request::post(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A small but valid-looking PDF payload.
pub fn pdf_bytes(len: usize) -> Vec<u8> {
    let mut data = b"%PDF-1.4\n".to_vec();
    data.resize(len.max(data.len()), b'0');
    data
}
