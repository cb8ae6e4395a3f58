//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use taskhub_api::AppState;
use taskhub_api::router::build_router;
use taskhub_core::config::AppConfig;
use taskhub_database::Stores;

/// Test application over fresh in-memory stores.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// State shared with the router, for direct gateway access
    pub state: AppState,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// An account created through the API.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub token: String,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.database.provider = "memory".to_string();
        config.auth.jwt_secret = "integration-test-secret".to_string();

        let state = AppState::new(config, Stores::memory());
        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    /// Sign up an admin and log in.
    pub async fn admin(&self, email: &str) -> Account {
        let response = self
            .request(
                "POST",
                "/api/auth/signup",
                Some(json!({ "name": "Admin", "email": email, "password": "secret123" })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

        let id = response.body["user"]["id"]
            .as_str()
            .expect("No user id in signup response")
            .to_string();
        let token = self.login(email, "secret123").await;
        Account { id, token }
    }

    /// Create a worker as `admin` and log in as it.
    pub async fn worker(&self, admin: &Account, name: &str, email: &str) -> Account {
        let response = self
            .request(
                "POST",
                "/api/admin/worker",
                Some(json!({ "name": name, "email": email, "password": "secret123" })),
                Some(&admin.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

        let id = response.body["worker"]["id"]
            .as_str()
            .expect("No worker id in response")
            .to_string();
        let token = self.login(email, "secret123").await;
        Account { id, token }
    }

    /// Create a task as `admin`, optionally assigned, and return its id.
    pub async fn task(&self, admin: &Account, title: &str, assigned_to: Option<&Account>) -> String {
        let response = self
            .request(
                "POST",
                "/api/admin/task",
                Some(json!({
                    "title": title,
                    "priority": "high",
                    "assignedTo": assigned_to.map(|w| w.id.clone()),
                })),
                Some(&admin.token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["task"]["id"]
            .as_str()
            .expect("No task id in response")
            .to_string()
    }

    /// The caller's notifications, newest first.
    pub async fn notifications(&self, account: &Account) -> Vec<Value> {
        let response = self
            .request("GET", "/api/notifications", None, Some(&account.token))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["notifications"]
            .as_array()
            .cloned()
            .unwrap_or_default()
    }
}
