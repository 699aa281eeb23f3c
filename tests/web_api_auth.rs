//! Web API Authentication Tests
//!
//! Integration tests for registration, login and the public routes.

use axum::http::StatusCode;
use axum_test::TestServer;
use filehub::web::{build_state, create_app};
use filehub::{Database, FileStorage, TokenService};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

const TEST_SECRET: &str = "test-secret-key-for-testing-only";

/// Create a test server with an in-memory database and temporary storage.
async fn create_test_server() -> (TestServer, Arc<TokenService>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let storage = FileStorage::new(temp_dir.path()).expect("Failed to create storage");
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let tokens = Arc::new(TokenService::new(TEST_SECRET, 24));
    let state = build_state(&db, storage, tokens.clone(), 10 * 1024 * 1024);
    let router = create_app(Arc::new(state), tokens.clone(), &[]);

    let server = TestServer::new(router).expect("Failed to create test server");
    (server, tokens, temp_dir)
}

async fn register(server: &TestServer, email: &str, password: &str) -> axum_test::TestResponse {
    server
        .post("/api/v1/auth/register")
        .json(&json!({ "email": email, "password": password }))
        .await
}

async fn login(server: &TestServer, email: &str, password: &str) -> axum_test::TestResponse {
    server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .await
}

#[tokio::test]
async fn test_register_success() {
    let (server, _tokens, _dir) = create_test_server().await;

    let response = register(&server, "a@x.com", "secret1").await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["message"], "User registered successfully");
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (server, _tokens, _dir) = create_test_server().await;

    register(&server, "a@x.com", "secret1")
        .await
        .assert_status(StatusCode::CREATED);

    let response = register(&server, "a@x.com", "another1").await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert_eq!(body["error"]["message"], "Email is already registered");
}

#[tokio::test]
async fn test_register_duplicate_email_differs_in_case() {
    let (server, _tokens, _dir) = create_test_server().await;

    register(&server, "a@x.com", "secret1")
        .await
        .assert_status(StatusCode::CREATED);

    register(&server, "A@X.com", "secret1")
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_invalid_email() {
    let (server, _tokens, _dir) = create_test_server().await;

    let response = register(&server, "not-an-email", "secret1").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["email"].is_array());
}

#[tokio::test]
async fn test_register_short_password() {
    let (server, _tokens, _dir) = create_test_server().await;

    let response = register(&server, "a@x.com", "12345").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"]["details"]["password"].is_array());

    // Nothing was stored, so the same email can still register.
    register(&server, "a@x.com", "123456")
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_register_malformed_json() {
    let (server, _tokens, _dir) = create_test_server().await;

    let response = server
        .post("/api/v1/auth/register")
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_login_success() {
    let (server, tokens, _dir) = create_test_server().await;

    register(&server, "a@x.com", "secret1")
        .await
        .assert_status(StatusCode::CREATED);

    let response = login(&server, "a@x.com", "secret1").await;

    response.assert_status_ok();
    let body: Value = response.json();
    let token = body["token"].as_str().expect("token missing");
    let user = tokens.verify(token).expect("token should verify");
    assert!(user.user_id > 0);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let (server, _tokens, _dir) = create_test_server().await;

    register(&server, "a@x.com", "secret1")
        .await
        .assert_status(StatusCode::CREATED);

    let wrong_password = login(&server, "a@x.com", "wrong-password").await;
    let unknown_email = login(&server, "nobody@x.com", "secret1").await;

    wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    unknown_email.assert_status(StatusCode::UNAUTHORIZED);

    let wrong_body: Value = wrong_password.json();
    let unknown_body: Value = unknown_email.json();
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["error"]["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_missing_fields() {
    let (server, _tokens, _dir) = create_test_server().await;

    let response = login(&server, "", "").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_route_rejects_bad_tokens() {
    let (server, _tokens, _dir) = create_test_server().await;

    let response = server.get("/api/v1/files").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .get("/api/v1/files")
        .add_header(axum::http::header::AUTHORIZATION, "Bearer garbage")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_token_from_other_secret_rejected() {
    let (server, _tokens, _dir) = create_test_server().await;

    let foreign = TokenService::new("some-other-secret", 24)
        .issue(1)
        .expect("issue token");

    let response = server
        .get("/api/v1/files")
        .add_header(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", foreign),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ping() {
    let (server, _tokens, _dir) = create_test_server().await;

    let response = server.get("/ping").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "pong");
}

#[tokio::test]
async fn test_health() {
    let (server, _tokens, _dir) = create_test_server().await;

    let response = server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_openapi_document() {
    let (server, _tokens, _dir) = create_test_server().await;

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["paths"]["/api/v1/auth/login"].is_object());
}
