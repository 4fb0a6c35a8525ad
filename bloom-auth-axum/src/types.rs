use bloom_auth_core::AccountProfile;
use serde::{Deserialize, Serialize};

/// Login request body. Fields are optional so that missing ones surface as
/// the contract's `EMAIL_AND_PASSWORD_REQUIRED` error instead of a
/// deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: AccountProfile,
}

/// The identity baked into a verified bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct TokenIdentity {
    pub id: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyTokenResponse {
    pub success: bool,
    pub user: TokenIdentity,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
