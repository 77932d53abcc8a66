/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Router construction over an in-memory store
/// - Request helpers (JSON in, status + JSON out)
/// - Signup/login shortcuts that go through the real endpoints

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use contentflow_api::app::{build_router, AppState};
use contentflow_api::config::{ApiConfig, Config, JwtConfig};
use contentflow_shared::store::MemoryStore;
use serde_json::{json, Value};
use tower::Service as _;
use uuid::Uuid;

/// Password that clears the strength rule
pub const PASSWORD: &str = "Sup3r$ecret";

/// Test context containing the app and its backing store
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a fresh app over an empty in-memory store
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            jwt: JwtConfig {
                secret: "integration-test-secret-at-least-32-bytes".to_string(),
            },
        };

        let state = AppState::new(store.clone(), config);
        let app = build_router(state);

        TestContext { store, app }
    }

    /// Sends a request and returns status plus parsed JSON body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(token), Some(body)).await
    }

    pub async fn delete(
        &self,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request("DELETE", uri, Some(token), body).await
    }

    /// Registers a user via the signup endpoint; `kind` is the path segment
    /// (`admin`, `customer`, `creator`)
    pub async fn signup(&self, kind: &str, email: &str) -> Uuid {
        let (status, body) = self
            .request(
                "POST",
                &format!("/v1/auth/signup/{}", kind),
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);

        body["user_id"].as_str().unwrap().parse().unwrap()
    }

    /// Logs in and returns the access token
    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/v1/auth/login",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);

        body["access_token"].as_str().unwrap().to_string()
    }

    /// Signup plus login in one step
    pub async fn signup_and_login(&self, kind: &str, email: &str) -> (Uuid, String) {
        let id = self.signup(kind, email).await;
        let token = self.login(email).await;
        (id, token)
    }
}
