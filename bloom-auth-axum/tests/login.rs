use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use bloom_auth_axum::create_router;
use bloom_auth_core::{AttemptLedger, LockoutPolicy, LoginService, TokenConfig, TokenIssuer};
use bloom_auth_memory::{MemoryCredentialRepository, NewAccount};

fn test_app() -> Router {
    let repository = Arc::new(MemoryCredentialRepository::new());
    repository
        .create_account(
            NewAccount::new("sara@bloom.com", "Petals-2024!")
                .with_name("Sara")
                .with_phone("0501234567")
                .with_address("Riyadh"),
        )
        .unwrap();
    repository
        .create_account(NewAccount::new("admin@bloom.com", "Admin123!@#").with_role("admin"))
        .unwrap();

    let service = Arc::new(LoginService::new(
        repository,
        Arc::new(AttemptLedger::new()),
        LockoutPolicy::default(),
        Arc::new(TokenIssuer::new(TokenConfig::new("test-secret"))),
    ));

    create_router(service)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_login_success_returns_token_and_profile() {
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/api/login",
        json!({"email": "sara@bloom.com", "password": "Petals-2024!"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["email"], json!("sara@bloom.com"));
    assert_eq!(body["user"]["name"], json!("Sara"));
    assert_eq!(body["user"]["role"], json!("user"));
    assert_eq!(body["user"]["phone"], json!("0501234567"));
    assert_eq!(body["user"]["address"], json!("Riyadh"));

    // The password hash must never appear in the response.
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_missing_fields_rejected() {
    let app = test_app();

    for body in [
        json!({}),
        json!({"email": "sara@bloom.com"}),
        json!({"password": "Petals-2024!"}),
        json!({"email": "", "password": "Petals-2024!"}),
        json!({"email": "sara@bloom.com", "password": ""}),
    ] {
        let (status, response) = post_json(&app, "/api/login", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], json!("EMAIL_AND_PASSWORD_REQUIRED"));
    }
}

#[tokio::test]
async fn test_malformed_email_rejected() {
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/api/login",
        json!({"email": "not-an-email", "password": "whatever1"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("INVALID_EMAIL_FORMAT"));
}

#[tokio::test]
async fn test_failed_attempts_count_down_then_lock() {
    let app = test_app();
    let credentials = json!({"email": "sara@bloom.com", "password": "wrong-pass1"});

    let (status, body) = post_json(&app, "/api/login", credentials.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("INVALID_CREDENTIALS"));
    assert_eq!(body["remainingAttempts"], json!(2));

    let (status, body) = post_json(&app, "/api/login", credentials.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["remainingAttempts"], json!(1));

    // Third failure locks for the first tier.
    let (status, body) = post_json(&app, "/api/login", credentials).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], json!("ACCOUNT_LOCKED"));
    assert_eq!(body["minutes"], json!(15));
}

#[tokio::test]
async fn test_correct_password_rejected_while_locked() {
    let app = test_app();

    for _ in 0..3 {
        post_json(
            &app,
            "/api/login",
            json!({"email": "sara@bloom.com", "password": "wrong-pass1"}),
        )
        .await;
    }

    let (status, body) = post_json(
        &app,
        "/api/login",
        json!({"email": "sara@bloom.com", "password": "Petals-2024!"}),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], json!("ACCOUNT_LOCKED"));
}

#[tokio::test]
async fn test_success_resets_failure_count() {
    let app = test_app();

    for _ in 0..2 {
        post_json(
            &app,
            "/api/login",
            json!({"email": "sara@bloom.com", "password": "wrong-pass1"}),
        )
        .await;
    }

    let (status, _) = post_json(
        &app,
        "/api/login",
        json!({"email": "sara@bloom.com", "password": "Petals-2024!"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The counter restarts from three after a success.
    let (_, body) = post_json(
        &app,
        "/api/login",
        json!({"email": "sara@bloom.com", "password": "wrong-pass1"}),
    )
    .await;
    assert_eq!(body["remainingAttempts"], json!(2));
}

#[tokio::test]
async fn test_unknown_email_indistinguishable_from_wrong_password() {
    let app = test_app();

    let (status, body) = post_json(
        &app,
        "/api/login",
        json!({"email": "ghost@bloom.com", "password": "whatever1"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("INVALID_CREDENTIALS"));
    assert_eq!(body["remainingAttempts"], json!(2));
}

#[tokio::test]
async fn test_verify_token_round_trip() {
    let app = test_app();

    let (_, login) = post_json(
        &app,
        "/api/login",
        json!({"email": "admin@bloom.com", "password": "Admin123!@#"}),
    )
    .await;
    let token = login["token"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/verify-token")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["user"]["email"], json!("admin@bloom.com"));
    assert_eq!(body["user"]["role"], json!("admin"));
}

#[tokio::test]
async fn test_verify_token_requires_valid_bearer() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/verify-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], json!("TOKEN_REQUIRED"));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/verify-token")
                .header(header::AUTHORIZATION, "Bearer not.a.token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], json!("INVALID_TOKEN"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], json!("ok"));
}

#[tokio::test]
async fn test_unknown_api_path_returns_json_404() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], json!("NOT_FOUND"));
}
