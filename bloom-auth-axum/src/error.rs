use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors rendered to HTTP clients.
///
/// The JSON shapes (`success`/`error`/`remainingAttempts`/`minutes`) are the
/// storefront's wire contract and must not change.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("email and password are required")]
    MissingCredentials,

    #[error("invalid email format")]
    InvalidEmailFormat,

    #[error("invalid credentials")]
    InvalidCredentials { remaining_attempts: u32 },

    #[error("account locked for {minutes} minutes")]
    AccountLocked { minutes: i64 },

    #[error("token required")]
    TokenRequired,

    #[error("invalid token")]
    InvalidToken,

    #[error("forbidden")]
    Forbidden,

    #[error("internal server error: {0}")]
    Internal(String),
}

impl From<bloom_auth_core::Error> for ApiError {
    fn from(err: bloom_auth_core::Error) -> Self {
        match err {
            bloom_auth_core::Error::Auth(_) => ApiError::InvalidToken,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MissingCredentials => (
                StatusCode::BAD_REQUEST,
                json!({"success": false, "error": "EMAIL_AND_PASSWORD_REQUIRED"}),
            ),
            ApiError::InvalidEmailFormat => (
                StatusCode::BAD_REQUEST,
                json!({"success": false, "error": "INVALID_EMAIL_FORMAT"}),
            ),
            ApiError::InvalidCredentials { remaining_attempts } => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "success": false,
                    "error": "INVALID_CREDENTIALS",
                    "remainingAttempts": remaining_attempts,
                }),
            ),
            ApiError::AccountLocked { minutes } => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({"success": false, "error": "ACCOUNT_LOCKED", "minutes": minutes}),
            ),
            ApiError::TokenRequired => (
                StatusCode::UNAUTHORIZED,
                json!({"success": false, "error": "TOKEN_REQUIRED"}),
            ),
            ApiError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                json!({"success": false, "error": "INVALID_TOKEN"}),
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                json!({"success": false, "error": "FORBIDDEN"}),
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"success": false, "error": "SERVER_ERROR"}),
            ),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
