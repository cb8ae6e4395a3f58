//! Signup, login, and credential enforcement over HTTP.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_signup_and_login() {
    let app = TestApp::new();
    let admin = app.admin("boss@example.com").await;
    assert!(!admin.token.is_empty());

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "boss@example.com", "password": "secret123" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["role"], "admin");
    assert_eq!(response.body["name"], "Admin");
}

#[tokio::test]
async fn test_signup_rejects_duplicate_and_missing_fields() {
    let app = TestApp::new();
    app.admin("boss@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({ "name": "Again", "email": "boss@example.com", "password": "secret123" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "User already exists");

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({ "email": "new@example.com" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "All fields are required");
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = TestApp::new();
    app.admin("boss@example.com").await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "boss@example.com", "password": "wrong-password" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_missing_and_invalid_credentials_are_401() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/notifications", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "AUTHENTICATION");

    let response = app
        .request("GET", "/api/notifications", None, Some("not.a.jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let app = TestApp::new();
    let response = app
        .request("POST", "/api/auth/login", Some(json!(["not", "an", "object"])), None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION");
}

#[tokio::test]
async fn test_admin_routes_reject_workers() {
    let app = TestApp::new();
    let admin = app.admin("boss@example.com").await;
    let worker = app.worker(&admin, "Wendy", "wendy@example.com").await;

    for path in ["/api/admin/workers", "/api/admin/dashboard", "/api/admin/online-users"] {
        let response = app.request("GET", path, None, Some(&worker.token)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{path}");
    }

    let response = app
        .request("GET", "/api/admin/workers", None, Some(&admin.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["workers"].as_array().map(Vec::len), Some(1));
    assert!(response.body["workers"][0].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_profile_update() {
    let app = TestApp::new();
    let admin = app.admin("boss@example.com").await;
    let worker = app.worker(&admin, "Wendy", "wendy@example.com").await;

    let response = app
        .request(
            "PUT",
            "/api/worker/profile",
            Some(json!({ "name": "   " })),
            Some(&worker.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "name is required");

    let response = app
        .request(
            "PUT",
            "/api/worker/profile",
            Some(json!({ "name": "Wendy W." })),
            Some(&worker.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/worker/profile", None, Some(&worker.token))
        .await;
    assert_eq!(response.body["user"]["name"], "Wendy W.");
}
