#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use classifieds_api::config::{ServerConfig, StoreBackend};
use classifieds_api::router::build_app_router;
use classifieds_api::state::AppState;
use classifieds_api::storage::LocalFileStorage;
use classifieds_core::pagination::Paginator;
use classifieds_db::store::Stores;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const BASE_URL: &str = "http://media.test";

/// A router backed by a fresh in-memory store and a temporary media root.
///
/// Keep the value alive for the whole test; dropping it deletes the media
/// directory.
pub struct TestApp {
    pub router: Router,
    pub stores: Stores,
    pub media: TempDir,
}

impl TestApp {
    pub fn media_root(&self) -> &Path {
        self.media.path()
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(media_root: &Path, page_size: usize) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        page_size,
        store_backend: StoreBackend::Memory,
        media_root: media_root.to_path_buf(),
        public_base_url: BASE_URL.to_string(),
        max_upload_bytes: 1024 * 1024,
    }
}

/// Build the full application router with the production middleware stack.
pub fn build_test_app() -> TestApp {
    build_test_app_with_page_size(10)
}

pub fn build_test_app_with_page_size(page_size: usize) -> TestApp {
    let media = tempfile::tempdir().unwrap();
    let config = test_config(media.path(), page_size);
    let stores = Stores::in_memory();

    let state = AppState {
        stores: stores.clone(),
        storage: Arc::new(LocalFileStorage::new(media.path(), BASE_URL)),
        paginator: Paginator::new(page_size).unwrap(),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        stores,
        media,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send_json(app: &TestApp, method: Method, uri: &str, body: &Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &TestApp, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, &body).await
}

pub async fn patch_json(app: &TestApp, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PATCH, uri, &body).await
}

/// POST a `multipart/form-data` body with one file field.
pub async fn post_file(
    app: &TestApp,
    uri: &str,
    field: &str,
    filename: &str,
    bytes: &[u8],
) -> Response<Body> {
    const BOUNDARY: &str = "X-CLASSIFIEDS-TEST-BOUNDARY";

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_category(app: &TestApp, name: &str) -> i64 {
    let response = post_json(app, "/api/v1/categories", json!({ "name": name })).await;
    assert_eq!(response.status(), 201);
    body_json(response).await["id"].as_i64().unwrap()
}

pub async fn create_location(app: &TestApp, name: &str) -> i64 {
    let response = post_json(
        app,
        "/api/v1/locations",
        json!({ "name": name, "lat": 55.7558, "lng": 37.6173 }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["id"].as_i64().unwrap()
}

pub async fn create_user(app: &TestApp, first_name: &str, location_ids: &[i64]) -> i64 {
    let response = post_json(
        app,
        "/api/v1/users",
        json!({
            "first_name": first_name,
            "last_name": "Tester",
            "user_name": first_name.to_lowercase(),
            "password": "s3cret-password",
            "age": 30,
            "location_ids": location_ids,
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["id"].as_i64().unwrap()
}

pub async fn create_ad(
    app: &TestApp,
    name: &str,
    author_id: i64,
    category_id: i64,
    price: f64,
) -> i64 {
    let response = post_json(
        app,
        "/api/v1/ads",
        json!({
            "name": name,
            "author_id": author_id,
            "category_id": category_id,
            "price": price,
            "description": format!("{name} for sale"),
            "is_published": true,
        }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["id"].as_i64().unwrap()
}
