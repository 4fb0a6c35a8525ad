//! Per-email failed-login bookkeeping.
//!
//! The ledger is a process-lifetime map from email to [`AttemptEntry`]. It is
//! intentionally not persisted: a restart clears all lockouts, which is
//! acceptable because the lockout is a deterrent, not a hard security
//! boundary. Entries are created lazily on the first recorded failure and
//! removed again on success or a full cool-down reset.
//!
//! Concurrent failures for the same email may race on the read-modify-write
//! and miscount by one; that is accepted soft-limiting, not linearizable
//! accounting.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// Lockout bookkeeping for a single email address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptEntry {
    /// Failed attempts since the last reset or lockout.
    pub failure_count: u32,
    /// While set and in the future, login attempts are rejected outright.
    pub locked_until: Option<DateTime<Utc>>,
    /// Position in the escalating-duration table for the next lockout.
    pub lockout_sequence: usize,
    /// Onset of the most recent maximum-tier lockout; starts the cool-down
    /// window after which the whole entry resets.
    pub last_lockout_at: Option<DateTime<Utc>>,
}

impl AttemptEntry {
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    /// Whole minutes remaining on an active lock, rounded up.
    pub fn minutes_remaining(&self, now: DateTime<Utc>) -> i64 {
        match self.locked_until {
            Some(until) if until > now => {
                let ms = (until - now).num_milliseconds();
                (ms + 59_999) / 60_000
            }
            _ => 0,
        }
    }
}

/// Shared in-memory ledger of failed login attempts, keyed by email.
///
/// All operations are total; none of them can fail.
#[derive(Debug, Default)]
pub struct AttemptLedger {
    entries: DashMap<String, AttemptEntry>,
}

impl AttemptLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entry for an email, or a zero-valued one if none exists.
    /// Does not insert the fresh entry.
    pub fn get(&self, email: &str) -> AttemptEntry {
        self.entries
            .get(email)
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    /// Increment the failure counter, creating the entry if absent.
    /// Returns the updated entry.
    pub fn record_failure(&self, email: &str) -> AttemptEntry {
        let mut entry = self.entries.entry(email.to_string()).or_default();
        entry.failure_count += 1;
        entry.clone()
    }

    /// Clear all bookkeeping for an email after a successful login.
    pub fn record_success(&self, email: &str) {
        self.entries.remove(email);
    }

    /// Put an email under lockout.
    ///
    /// Zeroes the failure counter and advances the sequence index. The
    /// cool-down marker is only (re)stamped when this lockout is the
    /// maximum tier; an existing marker is preserved otherwise.
    pub fn apply_lockout(
        &self,
        email: &str,
        now: DateTime<Utc>,
        duration: Duration,
        next_sequence: usize,
        begins_cool_down: bool,
    ) {
        let mut entry = self.entries.entry(email.to_string()).or_default();
        entry.failure_count = 0;
        entry.locked_until = Some(now + duration);
        entry.lockout_sequence = next_sequence;
        if begins_cool_down {
            entry.last_lockout_at = Some(now);
        }
    }

    /// Full cool-down reset: forget everything recorded for the email.
    pub fn reset(&self, email: &str) {
        self.entries.remove(email);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
