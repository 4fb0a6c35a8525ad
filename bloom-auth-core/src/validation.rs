//! Input validation for the login surface.
//!
//! The email shape check is deliberately permissive (`local@domain.tld` with
//! no whitespace) because the HTTP contract's `INVALID_EMAIL_FORMAT` error is
//! defined against that shape, not against a full RFC 5322 parse.

use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// Check whether a string looks like an email address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Validates an email address, distinguishing missing from malformed.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::MissingField("email".to_string()));
    }

    if email.len() > 254 {
        return Err(ValidationError::InvalidEmail(
            "email is too long".to_string(),
        ));
    }

    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}
