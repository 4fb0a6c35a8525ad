use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json,
    body::{Body, Bytes},
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode, header, request::Parts},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

use bloom_auth_core::{
    LoginService,
    detector::{flatten_values, is_suspicious},
    repositories::CredentialRepository,
};

use crate::error::ApiError;

/// Shared state for the authenticated routes and guards.
pub struct AuthState<C: CredentialRepository> {
    pub service: Arc<LoginService<C>>,
}

impl<C: CredentialRepository> Clone for AuthState<C> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

/// Paths exempt from the abuse gate. Login and registration bodies carry
/// credential-shaped content that would otherwise false-positive.
pub const EXEMPT_API_PATHS: &[&str] = &[
    "/api/login",
    "/api/register",
    "/api/send-email-code",
    "/api/verify-code",
    "/api/email/send-code",
    "/api/sms/send-code",
];

/// Roles allowed through [`require_staff`].
pub const STAFF_ROLES: &[&str] = &["admin", "manager"];

/// Upper bound on how much request body the guard will buffer for scanning.
const MAX_SCANNED_BODY: usize = 2 * 1024 * 1024;

static BLOCKED_PAGE: &str = r#"<!DOCTYPE html>
<html dir="rtl" lang="ar">
<head><meta charset="utf-8"><title>تم منع النشاط</title></head>
<body style="font-family: Arial; text-align: center; padding: 50px;">
  <h1>🚫 تم منع النشاط</h1>
  <p>تم منع هذا الطلب بسبب نشاط مشبوه.</p>
</body>
</html>
"#;

/// Request-level abuse gate.
///
/// Flattens the request URL, query values, body values, and selected headers
/// into a bag of strings and rejects the request if any of them is
/// suspicious. API paths get a JSON rejection, browser navigations an HTML
/// warning page. The body is buffered and handed back to the inner service
/// unchanged.
pub async fn abuse_guard(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if EXEMPT_API_PATHS.iter().any(|p| path.starts_with(p)) {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, MAX_SCANNED_BODY).await {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!(path = %parts.uri.path(), "request body too large to scan");
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({"success": false, "error": "PAYLOAD_TOO_LARGE"})),
            )
                .into_response();
        }
    };

    if let Some(sample) = find_suspicious(&parts, &bytes) {
        tracing::warn!(
            ip = %client_addr(&parts),
            path = %parts.uri,
            sample = %sample,
            "blocked suspicious request"
        );
        return blocked_response(parts.uri.path());
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    next.run(request).await
}

/// Bearer-token guard for staff-only routes (admin panel surface).
///
/// Verifies the token and requires an `admin` or `manager` role; the
/// verified claims are inserted into request extensions for handlers.
pub async fn require_staff<C>(
    State(state): State<AuthState<C>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    C: CredentialRepository,
{
    let token = extract_bearer_token(request.headers()).ok_or(ApiError::TokenRequired)?;

    let claims = state
        .service
        .tokens()
        .verify(&token)
        .map_err(|_| ApiError::InvalidToken)?;

    if !STAFF_ROLES.contains(&claims.role.as_str()) {
        return Err(ApiError::Forbidden);
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Gather every request-derived string worth scanning and return the first
/// suspicious one.
fn find_suspicious(parts: &Parts, body: &Bytes) -> Option<String> {
    let mut bag: Vec<String> = Vec::new();

    bag.push(parts.uri.to_string());
    if let Some(query) = parts.uri.query() {
        bag.extend(form_urlencoded::parse(query.as_bytes()).map(|(_, value)| value.into_owned()));
    }

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    if content_type.starts_with("application/json") {
        // An unparseable body is left to the inner handler to reject.
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
            flatten_values(&value, &mut bag);
        }
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        bag.extend(form_urlencoded::parse(body).map(|(_, value)| value.into_owned()));
    }

    for name in [header::USER_AGENT, header::REFERER] {
        if let Some(value) = parts.headers.get(&name).and_then(|v| v.to_str().ok()) {
            bag.push(value.to_string());
        }
    }

    bag.into_iter().find(|value| is_suspicious(value))
}

fn blocked_response(path: &str) -> Response {
    if path.starts_with("/api/") {
        (
            StatusCode::FORBIDDEN,
            Json(json!({
                "success": false,
                "error": "SUSPICIOUS_ACTIVITY",
                "message": "Request blocked due to suspicious activity",
            })),
        )
            .into_response()
    } else {
        (StatusCode::FORBIDDEN, Html(BLOCKED_PAGE)).into_response()
    }
}

fn client_addr(parts: &Parts) -> String {
    if let Some(forwarded) = parts
        .headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
    {
        return forwarded.trim().to_string();
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
