//! Diploma Core — Fundamental types, errors, events, and configuration for
//! the Diploma academic credential registry.

pub mod config;
pub mod error;
pub mod events;
pub mod types;

pub use config::DeploymentConfig;
pub use error::RegistryError;
pub use events::RegistryEvent;
pub use types::{Address, CredentialId, CredentialRecord, IssueRequest, Role};
