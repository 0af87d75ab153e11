use dashmap::DashMap;

use diploma_core::{Address, RegistryError, Role};

/// Tracks the admin and the accredited issuers.
///
/// Grants are monotone: once an address holds the issuer role it keeps it.
pub struct RoleRegistry {
    /// The single admin, fixed at deployment.
    admin: Address,
    /// Issuer address → display name recorded at registration.
    issuers: DashMap<Address, String>,
}

impl RoleRegistry {
    /// Create a registry whose only role holder is `admin`.
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            issuers: DashMap::new(),
        }
    }

    /// The configured admin.
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Whether `address` holds `role`.
    pub fn has_role(&self, address: &Address, role: Role) -> bool {
        match role {
            Role::Admin => *address == self.admin,
            Role::Issuer => self.issuers.contains_key(address),
        }
    }

    /// Fail with `Unauthorized` unless `caller` holds `role`.
    pub fn require(&self, caller: &Address, role: Role) -> Result<(), RegistryError> {
        if self.has_role(caller, role) {
            Ok(())
        } else {
            Err(RegistryError::Unauthorized {
                caller: *caller,
                required: role,
            })
        }
    }

    /// Display name recorded for an issuer.
    pub fn issuer_name(&self, address: &Address) -> Option<String> {
        self.issuers.get(address).map(|e| e.value().clone())
    }

    /// All issuer addresses, sorted.
    pub fn issuers(&self) -> Vec<Address> {
        let mut issuers: Vec<Address> = self.issuers.iter().map(|e| *e.key()).collect();
        issuers.sort();
        issuers
    }

    /// Grant the issuer role to `target`. Admin only.
    ///
    /// Granting again keeps the role and replaces the display name.
    /// Returns whether the role was newly granted.
    pub(crate) fn grant_issuer(
        &self,
        caller: &Address,
        target: Address,
        name: String,
    ) -> Result<bool, RegistryError> {
        self.require(caller, Role::Admin)?;
        let newly_granted = self.issuers.insert(target, name).is_none();
        tracing::debug!(issuer = %target, newly_granted, "issuer role granted");
        Ok(newly_granted)
    }
}
