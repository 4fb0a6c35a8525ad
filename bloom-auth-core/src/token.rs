//! Signed, time-limited session tokens.
//!
//! Tokens are HS256 JWTs bound to the account id, email, and role. They are
//! self-contained: verification needs no store lookup, and revocation before
//! expiry is not supported.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    error::{AuthError, CryptoError},
    user::UserId,
};

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Account id.
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Signing configuration for session tokens.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    ttl: Duration,
    issuer: Option<String>,
}

impl TokenConfig {
    /// HS256 config with the default 24-hour lifetime.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::hours(24),
            issuer: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }
}

/// Issues and verifies HS256 session tokens.
pub struct TokenIssuer {
    config: TokenConfig,
}

impl TokenIssuer {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// Sign a token for an authenticated account.
    pub fn issue(
        &self,
        user_id: &UserId,
        email: &str,
        role: &str,
        now: DateTime<Utc>,
    ) -> Result<String, Error> {
        let claims = TokenClaims {
            sub: user_id.as_str().to_string(),
            email: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + self.config.ttl).timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.config.secret),
        )
        .map_err(|e| Error::Crypto(CryptoError::TokenSigning(e.to_string())))
    }

    /// Verify a token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, Error> {
        let mut validation = Validation::default();
        if let Some(issuer) = &self.config.issuer {
            validation.set_issuer(&[issuer]);
        }

        let data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(&self.config.secret),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                Error::Auth(AuthError::TokenExpired)
            }
            _ => Error::Auth(AuthError::InvalidToken(e.to_string())),
        })?;

        Ok(data.claims)
    }
}
