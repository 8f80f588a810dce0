#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use smartcon_api::{router, AppContext};
use smartcon_domain::{Config, DatabaseConfig, ExportConfig};
use tempfile::TempDir;
use tower::ServiceExt;

/// Router over a fresh database; the temp dir holds the db and exports.
pub struct TestApp {
    pub ctx: Arc<AppContext>,
    pub router: Router,
    _temp_dir: TempDir,
}

pub fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        database: DatabaseConfig {
            path: temp_dir.path().join("smartcon.db").display().to_string(),
            pool_size: 4,
        },
        export: ExportConfig {
            output_dir: temp_dir.path().join("exports").display().to_string(),
        },
        ..Config::default()
    }
}

pub async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().expect("failed to create temporary directory");
    let ctx = AppContext::new(test_config(&temp_dir)).expect("failed to build context");
    ctx.start().await.expect("failed to start context");
    let ctx = Arc::new(ctx);
    TestApp { router: router(Arc::clone(&ctx)), ctx, _temp_dir: temp_dir }
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).expect("request")).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send_json("POST", uri, body).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send_json("PUT", uri, body).await
    }

    async fn send_json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("router call");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}
