//! Axum integration for the Bloom Store authentication subsystem.
//!
//! Provides ready-made routes for login and token verification, a
//! request-level abuse gate that rejects suspicious input before it reaches
//! any handler, and a bearer-token guard for staff-only routes.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bloom_auth_axum::create_router;
//! use bloom_auth_core::{AttemptLedger, LockoutPolicy, LoginService, TokenConfig, TokenIssuer};
//! use bloom_auth_memory::MemoryCredentialRepository;
//!
//! # async fn run() {
//! let repository = Arc::new(MemoryCredentialRepository::new());
//! let service = Arc::new(LoginService::new(
//!     repository,
//!     Arc::new(AttemptLedger::new()),
//!     LockoutPolicy::default(),
//!     Arc::new(TokenIssuer::new(TokenConfig::new("change-me"))),
//! ));
//!
//! let app = create_router(service);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//! axum::serve(listener, app).await.unwrap();
//! # }
//! ```

mod error;
mod middleware;
mod routes;
mod types;

pub use error::{ApiError, Result};
pub use middleware::{AuthState, EXEMPT_API_PATHS, STAFF_ROLES, abuse_guard, require_staff};
pub use routes::create_router;
pub use types::{HealthResponse, LoginRequest, LoginResponse, TokenIdentity, VerifyTokenResponse};
