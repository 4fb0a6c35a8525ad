//! Repository traits consumed by the services.

mod credential;

pub use credential::CredentialRepository;
