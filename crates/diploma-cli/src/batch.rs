//! Batch files: a JSON array of registry calls executed in order against one
//! deployment.
//!
//! Each mutating call names its caller. A rejected call produces a failed
//! receipt and execution continues with the next call.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

use diploma_core::{Address, CredentialId, IssueRequest, RegistryError, Role};
use diploma_registry::CertificateRegistry;

/// A single call in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call {
    RegisterIssuer {
        caller: Address,
        issuer: Address,
        name: String,
    },
    WhitelistRecipient {
        caller: Address,
        recipient: Address,
    },
    IssueCredential {
        caller: Address,
        recipient: Address,
        metadata_uri: String,
        recipient_name: String,
        issuer_name: String,
        graduation_year: u16,
        field_of_study: String,
    },
    HasRole {
        address: Address,
        role: Role,
    },
    IsWhitelisted {
        address: Address,
    },
    GetRecord {
        credential_id: CredentialId,
    },
    GetHolderCredential {
        recipient: Address,
    },
    GetMetadataUri {
        credential_id: CredentialId,
    },
    GetOwner {
        credential_id: CredentialId,
    },
}

impl Call {
    /// Name of the operation, as used in the `op` tag.
    pub fn op(&self) -> &'static str {
        match self {
            Self::RegisterIssuer { .. } => "register_issuer",
            Self::WhitelistRecipient { .. } => "whitelist_recipient",
            Self::IssueCredential { .. } => "issue_credential",
            Self::HasRole { .. } => "has_role",
            Self::IsWhitelisted { .. } => "is_whitelisted",
            Self::GetRecord { .. } => "get_record",
            Self::GetHolderCredential { .. } => "get_holder_credential",
            Self::GetMetadataUri { .. } => "get_metadata_uri",
            Self::GetOwner { .. } => "get_owner",
        }
    }
}

/// Outcome of one call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    /// Position of the call in the batch.
    pub index: usize,
    pub op: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ReceiptError>,
}

/// Error details of a rejected call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptError {
    pub kind: &'static str,
    pub message: String,
}

/// Read a batch file.
pub fn load(path: &Path) -> anyhow::Result<Vec<Call>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read batch {}: {}", path.display(), e))?;
    let calls: Vec<Call> = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("invalid batch {}: {}", path.display(), e))?;
    Ok(calls)
}

/// Execute a single call.
pub fn execute(
    registry: &CertificateRegistry,
    index: usize,
    call: &Call,
) -> anyhow::Result<Receipt> {
    let outcome: Result<Value, RegistryError> = match call {
        Call::RegisterIssuer {
            caller,
            issuer,
            name,
        } => registry
            .register_issuer(caller, *issuer, name.clone())
            .map(|()| Value::Null),
        Call::WhitelistRecipient { caller, recipient } => registry
            .whitelist_recipient(caller, *recipient)
            .map(|()| Value::Null),
        Call::IssueCredential {
            caller,
            recipient,
            metadata_uri,
            recipient_name,
            issuer_name,
            graduation_year,
            field_of_study,
        } => {
            let request = IssueRequest::new(
                *recipient,
                metadata_uri.clone(),
                recipient_name.clone(),
                issuer_name.clone(),
                *graduation_year,
                field_of_study.clone(),
            );
            registry
                .issue_credential(caller, request)
                .map(|id| json!({ "credential_id": id }))
        }
        Call::HasRole { address, role } => Ok(json!(registry.has_role(address, *role))),
        Call::IsWhitelisted { address } => Ok(json!(registry.is_whitelisted(address))),
        Call::GetRecord { credential_id } => match registry.get_record(*credential_id) {
            Ok(record) => Ok(serde_json::to_value(record)?),
            Err(e) => Err(e),
        },
        Call::GetHolderCredential { recipient } => registry
            .get_holder_credential(recipient)
            .map(|id| json!(id)),
        Call::GetMetadataUri { credential_id } => {
            registry.get_metadata_uri(*credential_id).map(Value::String)
        }
        Call::GetOwner { credential_id } => registry
            .get_owner(*credential_id)
            .map(|owner| json!(owner)),
    };

    let receipt = match outcome {
        Ok(result) => Receipt {
            index,
            op: call.op(),
            ok: true,
            result: (!result.is_null()).then_some(result),
            error: None,
        },
        Err(e) => Receipt {
            index,
            op: call.op(),
            ok: false,
            result: None,
            error: Some(ReceiptError {
                kind: e.kind(),
                message: e.to_string(),
            }),
        },
    };
    Ok(receipt)
}
