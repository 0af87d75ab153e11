use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use diploma_core::{Address, CredentialId, CredentialRecord, IssueRequest, RegistryError};

use crate::whitelist::WhitelistLedger;

/// Authoritative storage of issued credentials.
///
/// Holds the forward index (id → record), the reverse index
/// (recipient → id), and the sequential id counter. A recipient appears in
/// the reverse index at most once, ever.
pub struct CredentialStore {
    /// Credential ID → record.
    records: DashMap<CredentialId, CredentialRecord>,
    /// Recipient → credential ID.
    holders: DashMap<Address, CredentialId>,
    /// Next identifier to allocate. Advanced only by successful issuance.
    next_id: AtomicU64,
}

impl CredentialStore {
    /// Create an empty store. The first credential will receive id 0.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            holders: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Full record of an issued credential.
    pub fn get_record(&self, id: CredentialId) -> Result<CredentialRecord, RegistryError> {
        self.records
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or(RegistryError::NotFound(id))
    }

    /// Credential held by `recipient`.
    pub fn get_holder_credential(&self, recipient: &Address) -> Result<CredentialId, RegistryError> {
        self.holders
            .get(recipient)
            .map(|e| *e.value())
            .ok_or(RegistryError::NoCredential(*recipient))
    }

    /// Metadata URI of an issued credential.
    pub fn get_metadata_uri(&self, id: CredentialId) -> Result<String, RegistryError> {
        self.records
            .get(&id)
            .map(|e| e.metadata_uri.clone())
            .ok_or(RegistryError::NotFound(id))
    }

    /// Owner of an issued credential.
    pub fn get_owner(&self, id: CredentialId) -> Result<Address, RegistryError> {
        self.records
            .get(&id)
            .map(|e| e.owner)
            .ok_or(RegistryError::NotFound(id))
    }

    /// Number of credentials owned by `owner` (0 or 1).
    pub fn balance_of(&self, owner: &Address) -> u64 {
        u64::from(self.holders.contains_key(owner))
    }

    /// Number of credentials issued so far.
    pub fn total_issued(&self) -> u64 {
        self.next_id.load(Ordering::Acquire)
    }

    /// IDs of the credentials minted by `issuer`, ascending.
    pub fn credentials_issued_by(&self, issuer: &Address) -> Vec<CredentialId> {
        let mut ids: Vec<CredentialId> = self
            .records
            .iter()
            .filter(|e| e.issuer == *issuer)
            .map(|e| *e.key())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Mint a credential for a whitelisted recipient.
    ///
    /// The caller's issuer role must already have been checked, and calls
    /// must be serialized (the registry's write gate does both). All
    /// preconditions are evaluated before anything is written.
    pub(crate) fn issue(
        &self,
        caller: &Address,
        request: IssueRequest,
        whitelist: &WhitelistLedger,
    ) -> Result<CredentialId, RegistryError> {
        let recipient = request.recipient;
        if !whitelist.is_approved(&recipient) {
            return Err(RegistryError::NotWhitelisted(recipient));
        }
        if recipient.is_zero() {
            return Err(RegistryError::InvalidRecipient(recipient));
        }

        // The vacant entry stays locked until the reverse index is written.
        match self.holders.entry(recipient) {
            Entry::Occupied(existing) => Err(RegistryError::AlreadyCertified {
                recipient,
                credential_id: *existing.get(),
            }),
            Entry::Vacant(slot) => {
                let id = self.next_id.load(Ordering::Acquire);
                let record = CredentialRecord::from_request(id, *caller, request);
                self.records.insert(id, record);
                slot.insert(id);
                // Publish the id only once both indices hold it.
                self.next_id.store(id + 1, Ordering::Release);
                tracing::debug!(credential_id = id, recipient = %recipient, "credential indexed");
                Ok(id)
            }
        }
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}
