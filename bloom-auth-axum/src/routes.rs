use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use bloom_auth_core::{LoginOutcome, LoginService, repositories::CredentialRepository};

use crate::{
    error::ApiError,
    middleware::{AuthState, abuse_guard, extract_bearer_token},
    types::{HealthResponse, LoginRequest, LoginResponse, TokenIdentity, VerifyTokenResponse},
};

/// Build the public API router.
///
/// The abuse gate wraps every route, including the fallback, so unmatched
/// paths are scanned too. Exempt paths are decided inside the gate, not by
/// route registration.
pub fn create_router<C>(service: Arc<LoginService<C>>) -> Router
where
    C: CredentialRepository,
{
    let state = AuthState { service };

    Router::new()
        .route("/api/login", post(login_handler))
        .route("/api/verify-token", post(verify_token_handler))
        .route("/api/health", get(health_handler))
        .fallback(fallback_handler)
        .layer(middleware::from_fn(abuse_guard))
        .with_state(state)
}

async fn login_handler<C>(
    State(state): State<AuthState<C>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError>
where
    C: CredentialRepository,
{
    let email = request.email.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    match state.service.login(&email, &password).await? {
        LoginOutcome::Success { token, user } => Ok(Json(LoginResponse {
            success: true,
            token,
            user,
        })),
        LoginOutcome::MissingCredentials => Err(ApiError::MissingCredentials),
        LoginOutcome::InvalidEmail => Err(ApiError::InvalidEmailFormat),
        LoginOutcome::InvalidCredentials { remaining_attempts } => {
            Err(ApiError::InvalidCredentials { remaining_attempts })
        }
        LoginOutcome::Locked { minutes } => Err(ApiError::AccountLocked { minutes }),
    }
}

async fn verify_token_handler<C>(
    State(state): State<AuthState<C>>,
    headers: HeaderMap,
) -> Result<Json<VerifyTokenResponse>, ApiError>
where
    C: CredentialRepository,
{
    let token = extract_bearer_token(&headers).ok_or(ApiError::TokenRequired)?;
    let claims = state
        .service
        .tokens()
        .verify(&token)
        .map_err(|_| ApiError::InvalidToken)?;

    Ok(Json(VerifyTokenResponse {
        success: true,
        user: TokenIdentity {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        },
    }))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn fallback_handler(uri: Uri) -> Response {
    if uri.path().starts_with("/api/") {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"success": false, "error": "NOT_FOUND"})),
        )
            .into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Html("<h1>404</h1><p>Page not found.</p>"),
        )
            .into_response()
    }
}
