//! Notifications emitted by the registry after each successful mutation.
//!
//! Rejected calls never produce an event.

use serde::{Deserialize, Serialize};

use crate::types::{Address, CredentialId};

/// State-change notifications published by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// The admin accredited an issuer (role granted and whitelisted).
    IssuerRegistered {
        /// Address of the accredited issuer.
        issuer: Address,
        /// Display name recorded for the issuer.
        name: String,
    },

    /// An issuer approved a recipient for certification.
    RecipientWhitelisted {
        /// Issuer that approved the recipient.
        issuer: Address,
        /// Approved recipient.
        recipient: Address,
    },

    /// A credential was minted.
    CredentialIssued {
        /// Identifier of the new credential.
        credential_id: CredentialId,
        /// Owner of the new credential.
        recipient: Address,
        /// Issuer that minted it.
        issuer: Address,
    },
}

impl RegistryEvent {
    /// Short name of the event, as used in the serialized `event` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IssuerRegistered { .. } => "issuer_registered",
            Self::RecipientWhitelisted { .. } => "recipient_whitelisted",
            Self::CredentialIssued { .. } => "credential_issued",
        }
    }
}
