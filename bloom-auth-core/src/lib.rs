//! Core authentication and abuse-detection functionality for the Bloom Store.
//!
//! This crate carries the storefront's login lockout subsystem and the
//! request-level suspicious-input detector:
//!
//! - [`ledger::AttemptLedger`] — per-email failed-attempt bookkeeping with
//!   process lifetime;
//! - [`policy::LockoutPolicy`] — pure escalating-lockout decisions
//!   (3 failures lock for 15/20/30/60 minutes, with a one-hour cool-down
//!   after the maximum tier);
//! - [`detector`] — heuristic XSS/SQLi classification of request-derived
//!   strings, with a carve-out for password-shaped input;
//! - [`services::LoginService`] — orchestrates credential verification
//!   against a [`repositories::CredentialRepository`] and issues signed
//!   session tokens via [`token::TokenIssuer`].
//!
//! Storage backends and the HTTP surface live in their own crates and plug
//! in through the repository trait.

pub mod detector;
pub mod error;
pub mod ledger;
pub mod policy;
pub mod repositories;
pub mod services;
pub mod token;
pub mod user;
pub mod validation;

pub use error::Error;
pub use ledger::{AttemptEntry, AttemptLedger};
pub use policy::{FailureDecision, LockoutPolicy};
pub use services::{LoginOutcome, LoginService};
pub use token::{TokenClaims, TokenConfig, TokenIssuer};
pub use user::{AccountProfile, AccountRecord, UserId};
