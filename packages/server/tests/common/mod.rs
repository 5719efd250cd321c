//! Shared test harness: the full router over a fresh in-memory store.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use server_core::kernel::MemoryStore;
use server_core::server::build_app;
use tower::ServiceExt;

pub struct TestHarness {
    app: Router,
}

#[allow(dead_code)]
impl TestHarness {
    pub fn new() -> Self {
        Self::with_federation_timeout(Duration::from_secs(2))
    }

    pub fn with_federation_timeout(timeout: Duration) -> Self {
        Self {
            app: build_app(Arc::new(MemoryStore::new()), timeout),
        }
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        actor: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(actor) = actor {
            builder = builder.header("x-actor-id", actor);
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("failed to build request"),
            None => builder.body(Body::empty()).expect("failed to build request"),
        };

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is not JSON")
        };

        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None, None).await
    }

    pub async fn post(&self, uri: &str, actor: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, actor, Some(body)).await
    }

    pub async fn put(&self, uri: &str, actor: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, actor, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, None, None).await
    }
}
