//! Common test utilities for in-process API testing.
//!
//! The fixture wires a real [`CatalogRepository`] over a [`MockKeyValueStore`]
//! so tests can inject store failures and inspect the persisted snapshot.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use shelfkeeper_core::{
    testing::MockKeyValueStore, CatalogRepository, Config, PersistFailurePolicy, Product,
};
use shelfkeeper_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use shelfkeeper_core::testing::fixtures;

/// Test fixture for API testing against a mock store.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock store - inject failures, inspect the snapshot
    pub store: Arc<MockKeyValueStore>,
    /// Repository behind the router
    pub catalog: Arc<CatalogRepository>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Run `load()` before serving (false leaves the catalog not ready)
    pub load: bool,
    /// Snapshot present in the store before load
    pub initial_snapshot: Option<String>,
    pub on_persist_failure: PersistFailurePolicy,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            load: true,
            initial_snapshot: None,
            on_persist_failure: PersistFailurePolicy::KeepInMemory,
        }
    }
}

impl TestFixture {
    /// Create a fixture with an empty, loaded catalog.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    pub async fn with_config(test_config: TestConfig) -> Self {
        let store = Arc::new(MockKeyValueStore::new());
        if let Some(snapshot) = &test_config.initial_snapshot {
            store.insert("products", snapshot).await;
        }

        let mut config = Config::default();
        config.catalog.on_persist_failure = test_config.on_persist_failure;

        let catalog = Arc::new(CatalogRepository::from_config(store.clone(), &config));
        if test_config.load {
            catalog.load().await;
        }

        let state = Arc::new(AppState::new(config, Arc::clone(&catalog)));
        let router = create_router(state);

        Self {
            router,
            store,
            catalog,
        }
    }

    /// Products currently persisted under the snapshot key.
    pub async fn persisted(&self) -> Vec<Product> {
        match self.store.stored("products").await {
            Some(blob) => serde_json::from_str(&blob).expect("Snapshot is not valid JSON"),
            None => Vec::new(),
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into()))
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
