use crate::types::{Address, CredentialId, Role};

/// Registry errors. Every rejected call leaves the registry unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("{caller} lacks {required}")]
    Unauthorized { caller: Address, required: Role },

    #[error("recipient {0} is not whitelisted")]
    NotWhitelisted(Address),

    #[error("recipient {recipient} already holds credential #{credential_id}")]
    AlreadyCertified {
        recipient: Address,
        credential_id: CredentialId,
    },

    #[error("credential #{0} not found")]
    NotFound(CredentialId),

    #[error("{0} holds no credential")]
    NoCredential(Address),

    #[error("invalid recipient: {0}")]
    InvalidRecipient(Address),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),
}

impl RegistryError {
    /// Stable machine-readable code for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::NotWhitelisted(_) => "not_whitelisted",
            Self::AlreadyCertified { .. } => "already_certified",
            Self::NotFound(_) => "not_found",
            Self::NoCredential(_) => "no_credential",
            Self::InvalidRecipient(_) => "invalid_recipient",
            Self::InvalidAddress(_) => "invalid_address",
            Self::UnknownRole(_) => "unknown_role",
        }
    }
}
