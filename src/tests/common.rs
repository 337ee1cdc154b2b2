use axum::{
    body::{to_bytes, Body},
    http::{self, Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::{
    build_app,
    config::Config,
    db::{memory_store, unmigrated_memory_store},
    services::leaderboard_service::LeaderboardService,
};

pub const TEST_SECRET: &str = "test_secret";

pub struct TestContext {
    pub app: Router,
    pub service: Arc<LeaderboardService>,
}

fn test_config(webhook_secret: Option<&str>) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        webhook_secret: webhook_secret.map(str::to_string),
        listen_addr: "127.0.0.1:8001".parse().unwrap(),
        max_connections: 1,
        migrate_on_startup: true,
    }
}

/// App over a fresh in-memory store with no webhook secret.
pub async fn setup() -> TestContext {
    setup_with_secret(None).await
}

pub async fn setup_with_secret(webhook_secret: Option<&str>) -> TestContext {
    let store = memory_store().await.expect("in-memory store");
    let service = Arc::new(LeaderboardService::new(Arc::new(store)));
    let app = build_app(service.clone(), Arc::new(test_config(webhook_secret)));

    TestContext { app, service }
}

/// App over an in-memory database that never had its migrations applied.
pub async fn setup_unmigrated() -> TestContext {
    let store = unmigrated_memory_store().await.expect("in-memory store");
    let service = Arc::new(LeaderboardService::new(Arc::new(store)));
    let app = build_app(service.clone(), Arc::new(test_config(None)));

    TestContext { app, service }
}

/// Helper to create a JSON body for requests.
pub fn json_body(json: &Value) -> Body {
    Body::from(json.to_string())
}

pub fn post_score(body: &Value, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(http::Method::POST)
        .uri("/update-score")
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(json_body(body)).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method(http::Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Sends one request and decodes the JSON response body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    (status, json)
}
