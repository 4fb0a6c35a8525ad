//! In-memory credential store.
//!
//! Backs the [`CredentialRepository`] trait with a process-local map. Meant
//! for tests, demos, and single-process deployments; nothing survives a
//! restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use bloom_auth_core::{
    Error,
    error::{StorageError, ValidationError},
    repositories::CredentialRepository,
    user::{AccountRecord, UserId},
    validation::validate_email,
};

/// Fields needed to seed an account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub role: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl NewAccount {
    /// A new active account with the default `user` role.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: None,
            role: "user".to_string(),
            phone: None,
            address: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// DashMap-backed credential store keyed by email.
#[derive(Debug, Default)]
pub struct MemoryCredentialRepository {
    accounts: DashMap<String, AccountRecord>,
    next_id: std::sync::atomic::AtomicU64,
}

impl MemoryCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account, hashing its password with argon2.
    pub fn create_account(&self, new: NewAccount) -> Result<AccountRecord, Error> {
        validate_email(&new.email)?;
        if new.password.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "password".to_string(),
            )));
        }
        if self.accounts.contains_key(&new.email) {
            return Err(Error::Storage(StorageError::Constraint(
                "email already registered".to_string(),
            )));
        }

        let seq = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1;
        let record = AccountRecord {
            id: UserId::new(&format!("usr_{seq}")),
            name: new.name,
            email: new.email.clone(),
            password_hash: password_auth::generate_hash(&new.password),
            role: new.role,
            phone: new.phone,
            address: new.address,
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
        };

        self.accounts.insert(new.email, record.clone());
        Ok(record)
    }

    /// Deactivate an account. Returns false when the email is unknown.
    pub fn deactivate(&self, email: &str) -> bool {
        match self.accounts.get_mut(email) {
            Some(mut record) => {
                record.is_active = false;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[async_trait]
impl CredentialRepository for MemoryCredentialRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, Error> {
        Ok(self.accounts.get(email).map(|r| r.clone()))
    }

    async fn touch_last_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), Error> {
        // No-op for unknown ids, deliberately: see the trait's
        // enumeration-safety notes.
        for mut record in self.accounts.iter_mut() {
            if &record.id == id {
                record.last_login_at = Some(at);
                break;
            }
        }
        Ok(())
    }
}
