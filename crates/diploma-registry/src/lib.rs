//! Diploma Registry — Role registry, whitelist ledger, credential store, and
//! the access-controlled [`CertificateRegistry`] through which every
//! mutation flows.
//!
//! The component types expose read operations publicly; their mutators are
//! crate-private so authorization cannot be bypassed.

pub mod registry;
pub mod roles;
pub mod store;
pub mod whitelist;

pub use registry::CertificateRegistry;
pub use roles::RoleRegistry;
pub use store::CredentialStore;
pub use whitelist::WhitelistLedger;
