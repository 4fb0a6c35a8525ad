//! Repository trait for stored account credentials.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{Error, user::AccountRecord, user::UserId};

/// Read access to the persisted account credentials.
///
/// The login service only consumes this interface; it never creates or
/// mutates accounts beyond last-login bookkeeping.
///
/// # Security Considerations
///
/// Callers treat a `None` lookup result identically to a failed password
/// comparison so that responses never reveal whether an email is registered.
/// Implementations should likewise make `touch_last_login` a no-op for
/// unknown ids rather than an error.
#[async_trait]
pub trait CredentialRepository: Send + Sync + 'static {
    /// Look up an account by email.
    ///
    /// Returns `Ok(None)` when no account exists; `Err` is reserved for
    /// store failures (connectivity, query errors) and is never used to
    /// signal a missing record.
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, Error>;

    /// Record the time of a successful login.
    async fn touch_last_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), Error>;
}
