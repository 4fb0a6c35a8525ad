//! Escalating lockout policy.
//!
//! Pure decisions over ledger state; the policy never touches the ledger
//! itself. Per email the lifecycle is cyclic:
//!
//! `Clear --failure--> Accumulating --3rd failure--> Locked(tier)`, where the
//! tier walks the duration table on each recurrence; the lock clears lazily
//! once its deadline passes, and any success returns to `Clear`. When the
//! maximum tier is applied, a cool-down marker is stamped; sixty idle
//! minutes after that marker, the whole entry resets and the ladder starts
//! over at the first tier.

use chrono::{DateTime, Duration, Utc};

use crate::ledger::AttemptEntry;

/// Decision for a single recorded failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureDecision {
    /// Below the threshold; tell the caller how many attempts remain.
    Counted { remaining_attempts: u32 },
    /// Threshold reached; lock the account.
    Lockout {
        duration: Duration,
        /// Sequence index to store for the lockout after this one.
        next_sequence: usize,
        /// True when this is the maximum tier, which starts the cool-down
        /// window and rewinds the sequence.
        begins_cool_down: bool,
    },
}

/// Lockout thresholds and durations.
///
/// The defaults are part of the HTTP contract: 3 failures lock for 15, then
/// 20, 30, and 60 minutes, and a full hour of quiet after the 60-minute tier
/// restarts the ladder.
#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    pub failure_threshold: u32,
    pub durations: Vec<Duration>,
    pub cool_down: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            durations: vec![
                Duration::minutes(15),
                Duration::minutes(20),
                Duration::minutes(30),
                Duration::minutes(60),
            ],
            cool_down: Duration::minutes(60),
        }
    }
}

impl LockoutPolicy {
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    pub fn with_durations(mut self, durations: Vec<Duration>) -> Self {
        self.durations = durations;
        self
    }

    pub fn with_cool_down(mut self, cool_down: Duration) -> Self {
        self.cool_down = cool_down;
        self
    }

    /// Whether the cool-down window has fully elapsed for this entry.
    ///
    /// Only meaningful for entries carrying a cool-down marker, i.e. ones
    /// that served a maximum-tier lockout.
    pub fn cool_down_elapsed(&self, entry: &AttemptEntry, now: DateTime<Utc>) -> bool {
        entry
            .last_lockout_at
            .is_some_and(|at| now - at >= self.cool_down)
    }

    /// Decide what a just-recorded failure means.
    ///
    /// `entry` must already include the failure being evaluated.
    pub fn evaluate_failure(&self, entry: &AttemptEntry) -> FailureDecision {
        if entry.failure_count < self.failure_threshold {
            return FailureDecision::Counted {
                remaining_attempts: self.failure_threshold - entry.failure_count,
            };
        }

        // Clamp to the last tier once the sequence runs past the table.
        let tier = entry.lockout_sequence.min(self.durations.len() - 1);
        let is_max_tier = tier == self.durations.len() - 1;

        FailureDecision::Lockout {
            duration: self.durations[tier],
            next_sequence: if is_max_tier {
                0
            } else {
                entry.lockout_sequence + 1
            },
            begins_cool_down: is_max_tier,
        }
    }
}
