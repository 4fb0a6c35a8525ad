//! Login orchestration: credential verification gated by the attempt ledger
//! and lockout policy.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{
    Error,
    ledger::AttemptLedger,
    policy::{FailureDecision, LockoutPolicy},
    repositories::CredentialRepository,
    token::TokenIssuer,
    user::AccountProfile,
    validation::is_valid_email,
};

/// Every expected result of a login call.
///
/// Denials are values, not errors; `Err` from [`LoginService::login`] means
/// the credential store or the signer failed, never that the password was
/// wrong.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    Success {
        token: String,
        user: AccountProfile,
    },
    /// Email or password missing from the request.
    MissingCredentials,
    /// Email present but not shaped like an email address.
    InvalidEmail,
    /// Wrong password or unknown account; the two are indistinguishable.
    InvalidCredentials {
        remaining_attempts: u32,
    },
    /// Locked now, or this very failure triggered the lockout.
    Locked {
        minutes: i64,
    },
}

/// Verifies presented credentials and issues session tokens, consulting the
/// attempt ledger and lockout policy before and after the password check.
///
/// Thread-safe; share one instance across request handlers so every handler
/// sees the same ledger.
pub struct LoginService<C: CredentialRepository> {
    credentials: Arc<C>,
    ledger: Arc<AttemptLedger>,
    policy: LockoutPolicy,
    tokens: Arc<TokenIssuer>,
}

impl<C: CredentialRepository> LoginService<C> {
    pub fn new(
        credentials: Arc<C>,
        ledger: Arc<AttemptLedger>,
        policy: LockoutPolicy,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            credentials,
            ledger,
            policy,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Attempt a login with the current wall-clock time.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, Error> {
        self.login_at(email, password, Utc::now()).await
    }

    /// Attempt a login at an explicit instant.
    ///
    /// Order matters and is part of the contract:
    /// 1. field and email-shape validation (no ledger mutation);
    /// 2. active-lock gate (no credential work while locked);
    /// 3. cool-down reset when the idle window has fully elapsed;
    /// 4. store lookup; unknown/inactive accounts take the same failure path
    ///    as a wrong password;
    /// 5. argon2 verification; failures feed the lockout policy;
    /// 6. success clears the ledger, stamps last-login, and signs a token.
    pub async fn login_at(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, Error> {
        if email.is_empty() || password.is_empty() {
            return Ok(LoginOutcome::MissingCredentials);
        }
        if !is_valid_email(email) {
            return Ok(LoginOutcome::InvalidEmail);
        }

        let entry = self.ledger.get(email);
        if entry.is_locked(now) {
            let minutes = entry.minutes_remaining(now);
            tracing::debug!(email, minutes, "login rejected, account locked");
            return Ok(LoginOutcome::Locked { minutes });
        }

        if self.policy.cool_down_elapsed(&entry, now) {
            tracing::debug!(email, "cool-down elapsed, lockout ladder reset");
            self.ledger.reset(email);
        }

        // A store failure propagates untouched: it must never count as a
        // failed attempt or it could lock accounts during an outage.
        let Some(record) = self.credentials.find_by_email(email).await? else {
            // Unknown accounts take the exact same path as a wrong password
            // so the response never reveals whether the email exists.
            return Ok(self.note_failure(email, now));
        };

        if !record.is_active || !Self::verify_password(password, &record.password_hash) {
            return Ok(self.note_failure(email, now));
        }

        self.ledger.record_success(email);

        if let Err(e) = self.credentials.touch_last_login(&record.id, now).await {
            // Bookkeeping only; the login itself still succeeds.
            tracing::warn!(email, error = %e, "failed to update last login timestamp");
        }

        let token = self
            .tokens
            .issue(&record.id, &record.email, &record.role, now)?;

        tracing::info!(email, role = %record.role, "login succeeded");
        Ok(LoginOutcome::Success {
            token,
            user: AccountProfile::from(&record),
        })
    }

    /// Count a failed attempt and apply the policy's decision.
    fn note_failure(&self, email: &str, now: DateTime<Utc>) -> LoginOutcome {
        let entry = self.ledger.record_failure(email);

        match self.policy.evaluate_failure(&entry) {
            FailureDecision::Counted { remaining_attempts } => {
                tracing::debug!(email, remaining_attempts, "login failed");
                LoginOutcome::InvalidCredentials { remaining_attempts }
            }
            FailureDecision::Lockout {
                duration,
                next_sequence,
                begins_cool_down,
            } => {
                self.ledger
                    .apply_lockout(email, now, duration, next_sequence, begins_cool_down);
                let minutes = duration.num_minutes();
                tracing::warn!(email, minutes, "account locked after repeated failures");
                LoginOutcome::Locked { minutes }
            }
        }
    }

    fn verify_password(password: &str, hash: &str) -> bool {
        use password_auth::verify_password;
        verify_password(password, hash).is_ok()
    }
}
