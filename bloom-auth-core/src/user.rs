//! Account records and the profile shape returned to authenticated clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unique, stable identifier for an account.
///
/// Treated as opaque; the storefront seeds these from its user store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: &str) -> Self {
        UserId(id.to_string())
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored credential record as read from the user store.
///
/// The login service only reads these and updates last-login bookkeeping; the
/// store owns creation and mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
    /// Argon2 password hash. Never serialized into client responses.
    pub password_hash: String,
    /// Role name as stored ("admin", "manager", "user", ...).
    pub role: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// The client-visible slice of an account, embedded in the login response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: UserId,
    pub name: Option<String>,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<&AccountRecord> for AccountProfile {
    fn from(record: &AccountRecord) -> Self {
        AccountProfile {
            id: record.id.clone(),
            name: record.name.clone(),
            email: record.email.clone(),
            role: record.role.clone(),
            phone: record.phone.clone(),
            address: record.address.clone(),
        }
    }
}
