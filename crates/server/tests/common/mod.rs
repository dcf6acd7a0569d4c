//! Common test utilities for in-process API testing.
//!
//! This module provides a test fixture that builds the router over a
//! temporary SQLite database (or an in-memory mock store) with a controllable
//! clock, so requests can be driven through `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use helpdesk_core::{
    testing::{FixedClock, MockTicketStore},
    SqliteReferenceStore, SqliteTicketStore, TicketService, TicketStore,
};
use helpdesk_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use helpdesk_core::testing::fixtures;

/// Instant the fixture clock starts at.
pub fn start_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// Test fixture holding an in-process router.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_ticket_creation() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/api/v1/tickets", json!({
///         "title": "Printer jam",
///         "category_id": 1,
///         "status": "New"
///     })).await;
///
///     assert_eq!(response.status, 201);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Clock used by the ticket service
    pub clock: Arc<FixedClock>,
    /// Set when built with [`TestFixture::with_mock_store`]
    pub mock_store: Option<Arc<MockTicketStore>>,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    /// Fixture backed by a SQLite file seeded with the fixture reference data.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Fixture whose tickets live in a [`MockTicketStore`], for failure injection.
    pub fn with_mock_store() -> Self {
        Self::build(Some(Arc::new(MockTicketStore::new())))
    }

    fn build(mock_store: Option<Arc<MockTicketStore>>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let reference = Arc::new(
            SqliteReferenceStore::new(&db_path).expect("Failed to create reference store"),
        );
        reference
            .seed(&fixtures::reference_config())
            .expect("Failed to seed reference data");

        let tickets: Arc<dyn TicketStore> = match &mock_store {
            Some(store) => store.clone() as Arc<dyn TicketStore>,
            None => Arc::new(
                SqliteTicketStore::new(&db_path).expect("Failed to create ticket store"),
            ),
        };

        let clock = Arc::new(FixedClock::new(start_time()));
        let service = TicketService::new(tickets, reference.clone(), reference)
            .with_clock(clock.clone());

        let router = create_router(Arc::new(AppState::new(Arc::new(service))));

        Self {
            router,
            clock,
            mock_store,
            temp_dir,
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

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Create a ticket and return its id, panicking unless it was accepted.
    pub async fn create(&self, body: Value) -> i64 {
        let response = self.post("/api/v1/tickets", body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["ticket"]["id"].as_i64().unwrap()
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

        let request = request_builder.body(body).unwrap();

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

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}
