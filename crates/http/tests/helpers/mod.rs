//! Test harness for HTTP API integration tests.
//!
//! Builds the router over an in-memory store and drives it with `oneshot`
//! (no sockets, no external database).

pub mod stores;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use giftlink_core::{GiftStore, MemoryStore};
use giftlink_http::{router, AppContext};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestHarness {
    pub app: Router,
}

/// A response with its body read to completion.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("Expected JSON body, got {:?}: {e}", self.body))
    }
}

impl TestHarness {
    /// Harness over a memory store seeded with `documents`.
    pub fn with_documents(documents: Vec<Value>) -> Self {
        Self::with_store(Arc::new(MemoryStore::from_documents(documents)))
    }

    pub fn with_store(store: Arc<dyn GiftStore>) -> Self {
        TestHarness { app: router(AppContext::new(store)) }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .expect("Failed to build request"),
            None => builder.body(Body::empty()).expect("Failed to build request"),
        };

        let response = self.app.clone().oneshot(request).await.expect("Router call failed");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        TestResponse { status, body: String::from_utf8_lossy(&bytes).into_owned() }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }
}
