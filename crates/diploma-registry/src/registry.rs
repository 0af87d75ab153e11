//! The access-controlled facade over the role registry, whitelist ledger,
//! and credential store.
//!
//! Every mutating call takes the caller's address explicitly, is checked
//! against the current role and whitelist state, and runs under a single
//! write gate so that it applies entirely or not at all. Reads take no gate
//! and perform no authorization.

use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

use diploma_core::{
    Address, CredentialId, CredentialRecord, DeploymentConfig, IssueRequest, RegistryError,
    RegistryEvent, Role,
};

use crate::roles::RoleRegistry;
use crate::store::CredentialStore;
use crate::whitelist::WhitelistLedger;

/// One deployment of the credential registry.
pub struct CertificateRegistry {
    roles: RoleRegistry,
    whitelist: WhitelistLedger,
    store: CredentialStore,
    /// Serializes mutating calls.
    gate: Mutex<()>,
    /// Publishes a notification after each successful mutation.
    event_tx: broadcast::Sender<RegistryEvent>,
}

impl CertificateRegistry {
    /// Deploy a registry. `config.admin` becomes the sole admin.
    pub fn deploy(config: DeploymentConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity.max(1));
        tracing::info!(admin = %config.admin, "certificate registry deployed");
        Self {
            roles: RoleRegistry::new(config.admin),
            whitelist: WhitelistLedger::new(),
            store: CredentialStore::new(),
            gate: Mutex::new(()),
            event_tx,
        }
    }

    /// Subscribe to state-change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.event_tx.subscribe()
    }

    // --- Mutations ---

    /// Accredit an issuer: grant the issuer role, whitelist it, and record
    /// its display name. Admin only.
    pub fn register_issuer(
        &self,
        caller: &Address,
        issuer: Address,
        name: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let _gate = self.lock();

        self.roles
            .require(caller, Role::Admin)
            .map_err(|e| rejected("register_issuer", caller, e))?;

        self.roles.grant_issuer(caller, issuer, name.clone())?;
        self.whitelist.approve_issuer(&self.roles, caller, issuer)?;

        tracing::info!(%issuer, %name, "issuer registered");
        self.emit(RegistryEvent::IssuerRegistered { issuer, name });
        Ok(())
    }

    /// Approve a recipient for certification. Requires the issuer role.
    pub fn whitelist_recipient(
        &self,
        caller: &Address,
        recipient: Address,
    ) -> Result<(), RegistryError> {
        let _gate = self.lock();

        self.roles
            .require(caller, Role::Issuer)
            .map_err(|e| rejected("whitelist_recipient", caller, e))?;

        self.whitelist
            .approve_recipient(&self.roles, caller, recipient)?;

        tracing::info!(issuer = %caller, %recipient, "recipient whitelisted");
        self.emit(RegistryEvent::RecipientWhitelisted {
            issuer: *caller,
            recipient,
        });
        Ok(())
    }

    /// Issue the recipient's one credential. Requires the issuer role; the
    /// recipient must be whitelisted and hold no credential yet.
    pub fn issue_credential(
        &self,
        caller: &Address,
        request: IssueRequest,
    ) -> Result<CredentialId, RegistryError> {
        let recipient = request.recipient;
        let _gate = self.lock();

        self.roles
            .require(caller, Role::Issuer)
            .map_err(|e| rejected("issue_credential", caller, e))?;

        let credential_id = self
            .store
            .issue(caller, request, &self.whitelist)
            .map_err(|e| rejected("issue_credential", caller, e))?;

        tracing::info!(
            issuer = %caller,
            %recipient,
            credential_id,
            "credential issued"
        );
        self.emit(RegistryEvent::CredentialIssued {
            credential_id,
            recipient,
            issuer: *caller,
        });
        Ok(credential_id)
    }

    // --- Reads ---

    /// Whether `address` holds `role`.
    pub fn has_role(&self, address: &Address, role: Role) -> bool {
        self.roles.has_role(address, role)
    }

    /// Whether `address` has been whitelisted (as issuer or as recipient).
    pub fn is_whitelisted(&self, address: &Address) -> bool {
        self.whitelist.is_approved(address)
    }

    /// Full record of a credential.
    pub fn get_record(&self, id: CredentialId) -> Result<CredentialRecord, RegistryError> {
        self.store.get_record(id)
    }

    /// Credential held by `recipient`.
    pub fn get_holder_credential(&self, recipient: &Address) -> Result<CredentialId, RegistryError> {
        self.store.get_holder_credential(recipient)
    }

    /// Metadata URI of a credential.
    pub fn get_metadata_uri(&self, id: CredentialId) -> Result<String, RegistryError> {
        self.store.get_metadata_uri(id)
    }

    /// Owner of a credential.
    pub fn get_owner(&self, id: CredentialId) -> Result<Address, RegistryError> {
        self.store.get_owner(id)
    }

    /// The admin of this deployment.
    pub fn admin(&self) -> Address {
        self.roles.admin()
    }

    /// Display name recorded when `issuer` was registered.
    pub fn issuer_name(&self, issuer: &Address) -> Option<String> {
        self.roles.issuer_name(issuer)
    }

    /// All accredited issuers, sorted.
    pub fn issuers(&self) -> Vec<Address> {
        self.roles.issuers()
    }

    /// Number of credentials owned by `owner` (0 or 1).
    pub fn balance_of(&self, owner: &Address) -> u64 {
        self.store.balance_of(owner)
    }

    /// Number of credentials issued by this deployment.
    pub fn total_issued(&self) -> u64 {
        self.store.total_issued()
    }

    /// IDs of credentials minted by `issuer`, ascending.
    pub fn credentials_issued_by(&self, issuer: &Address) -> Vec<CredentialId> {
        self.store.credentials_issued_by(issuer)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The gate guards no data, so a poisoned lock is still usable.
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: RegistryEvent) {
        // No subscribers is fine.
        let _ = self.event_tx.send(event);
    }
}

fn rejected(operation: &'static str, caller: &Address, error: RegistryError) -> RegistryError {
    tracing::warn!(
        operation,
        %caller,
        kind = error.kind(),
        error = %error,
        "call rejected"
    );
    error
}
