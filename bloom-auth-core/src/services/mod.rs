//! Services orchestrating the repositories, ledger, and policy.

mod login;

pub use login::{LoginOutcome, LoginService};
