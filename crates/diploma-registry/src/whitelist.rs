use dashmap::DashSet;

use diploma_core::{Address, RegistryError, Role};

use crate::roles::RoleRegistry;

/// Grow-only set of approved addresses.
///
/// Issuer approvals (made by the admin) and recipient approvals (made by an
/// issuer) share this one set. Approval is independent of role membership.
pub struct WhitelistLedger {
    approved: DashSet<Address>,
}

impl WhitelistLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            approved: DashSet::new(),
        }
    }

    /// Whether `address` has been approved.
    pub fn is_approved(&self, address: &Address) -> bool {
        self.approved.contains(address)
    }

    /// Approve an issuer. Admin only.
    pub(crate) fn approve_issuer(
        &self,
        roles: &RoleRegistry,
        caller: &Address,
        target: Address,
    ) -> Result<bool, RegistryError> {
        roles.require(caller, Role::Admin)?;
        Ok(self.approve(target))
    }

    /// Approve a recipient. Requires the issuer role; the caller's own
    /// approval flag is not consulted.
    pub(crate) fn approve_recipient(
        &self,
        roles: &RoleRegistry,
        caller: &Address,
        target: Address,
    ) -> Result<bool, RegistryError> {
        roles.require(caller, Role::Issuer)?;
        Ok(self.approve(target))
    }

    fn approve(&self, target: Address) -> bool {
        let newly_approved = self.approved.insert(target);
        tracing::debug!(address = %target, newly_approved, "address whitelisted");
        newly_approved
    }
}

impl Default for WhitelistLedger {
    fn default() -> Self {
        Self::new()
    }
}
