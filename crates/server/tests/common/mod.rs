//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock result source injected, enabling E2E testing without
//! reaching the real movie database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use filmlink_core::{
    testing::MockResultSource, Config, LookupService, ResultSource,
};

/// Re-export fixtures for test convenience
pub use filmlink_core::testing::fixtures;

/// Test fixture for E2E testing with a mock result source.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new().await;
///     fixture.source.set_records(vec![fixtures::movie_record("Heat", 12)]).await;
///
///     let response = fixture.get("/api/search?movie=Heat").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock source - configure upstream records and failures
    pub source: Arc<MockResultSource>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with default configuration.
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(config: Config) -> Self {
        let source = Arc::new(MockResultSource::named("mock"));

        let lookup = LookupService::new(
            Arc::clone(&source) as Arc<dyn ResultSource>,
            fixtures::default_profile(),
        )
        .with_cache_empty_results(config.lookup.cache_empty_results);

        let state = Arc::new(filmlink_server::state::AppState::new(config, lookup));
        let router = filmlink_server::api::create_router(state);

        Self { router, source }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).to_string();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            content_type,
            body,
            text,
        }
    }
}

#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}

#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
