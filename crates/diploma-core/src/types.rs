use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RegistryError;

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Account address of a caller, issuer, or recipient.
/// Textual form: `0x` followed by 40 hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address. Never a valid credential owner.
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Create an address with every byte set to `byte`.
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; ADDRESS_LEN])
    }

    /// Whether this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }
}

impl FromStr for Address {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(RegistryError::InvalidAddress(format!(
                "expected {} hex digits, got {}: {}",
                ADDRESS_LEN * 2,
                digits.len(),
                s
            )));
        }
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| RegistryError::InvalidAddress(format!("{}: {}", s, e)))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

/// Roles recognized by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The single trust root. Accredits issuers.
    #[serde(rename = "ADMIN_ROLE")]
    Admin,
    /// An accredited organization (university). Whitelists and certifies recipients.
    #[serde(rename = "ISSUER_ROLE", alias = "UNIVERSITY_ROLE")]
    Issuer,
}

impl Role {
    /// Stable textual name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN_ROLE",
            Self::Issuer => "ISSUER_ROLE",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN_ROLE" | "admin" => Ok(Self::Admin),
            "ISSUER_ROLE" | "UNIVERSITY_ROLE" | "issuer" => Ok(Self::Issuer),
            other => Err(RegistryError::UnknownRole(other.to_string())),
        }
    }
}

/// Sequential credential identifier. The first credential ever issued is 0.
pub type CredentialId = u64;

/// Arguments of a credential issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRequest {
    /// Address that will own the credential.
    pub recipient: Address,
    /// Opaque pointer to off-record content (e.g. `ipfs://...`).
    pub metadata_uri: String,
    /// Display name of the recipient.
    pub recipient_name: String,
    /// Display name of the issuing organization.
    pub issuer_name: String,
    /// Year of graduation.
    pub graduation_year: u16,
    /// Field of study (major).
    pub field_of_study: String,
}

impl IssueRequest {
    /// Create an issuance request.
    pub fn new(
        recipient: Address,
        metadata_uri: impl Into<String>,
        recipient_name: impl Into<String>,
        issuer_name: impl Into<String>,
        graduation_year: u16,
        field_of_study: impl Into<String>,
    ) -> Self {
        Self {
            recipient,
            metadata_uri: metadata_uri.into(),
            recipient_name: recipient_name.into(),
            issuer_name: issuer_name.into(),
            graduation_year,
            field_of_study: field_of_study.into(),
        }
    }
}

/// An issued academic credential. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Sequential identifier.
    pub credential_id: CredentialId,
    /// Recipient that owns the credential.
    pub owner: Address,
    /// Display name of the recipient.
    pub recipient_name: String,
    /// Display name of the issuing organization.
    pub issuer_name: String,
    /// Year of graduation.
    pub graduation_year: u16,
    /// Field of study (major).
    pub field_of_study: String,
    /// Always true for issued credentials.
    pub verified: bool,
    /// Opaque pointer to off-record content.
    pub metadata_uri: String,
    /// Address of the issuer that minted the credential.
    pub issuer: Address,
    /// When the credential was minted.
    pub issued_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Build a verified record from an issuance request.
    pub fn from_request(credential_id: CredentialId, issuer: Address, request: IssueRequest) -> Self {
        Self {
            credential_id,
            owner: request.recipient,
            recipient_name: request.recipient_name,
            issuer_name: request.issuer_name,
            graduation_year: request.graduation_year,
            field_of_study: request.field_of_study,
            verified: true,
            metadata_uri: request.metadata_uri,
            issuer,
            issued_at: Utc::now(),
        }
    }
}

impl fmt::Display for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} ({}, {} {})",
            self.credential_id,
            self.recipient_name,
            self.issuer_name,
            self.field_of_study,
            self.graduation_year
        )
    }
}
