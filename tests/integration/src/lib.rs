//! Shared fixtures for the cross-crate scenario tests.

use diploma_core::{Address, DeploymentConfig, IssueRequest};
use diploma_registry::CertificateRegistry;

/// The six accounts used throughout the scenarios.
#[derive(Debug, Clone, Copy)]
pub struct Accounts {
    pub admin: Address,
    pub university_1: Address,
    pub university_2: Address,
    pub student_1: Address,
    pub student_2: Address,
    pub general_user: Address,
}

impl Accounts {
    pub fn new() -> Self {
        Self {
            admin: Address::repeat_byte(0xa0),
            university_1: Address::repeat_byte(0xb1),
            university_2: Address::repeat_byte(0xb2),
            student_1: Address::repeat_byte(0xc1),
            student_2: Address::repeat_byte(0xc2),
            general_user: Address::repeat_byte(0xd0),
        }
    }
}

impl Default for Accounts {
    fn default() -> Self {
        Self::new()
    }
}

/// Deploy a fresh registry administered by `accounts.admin`.
pub fn deploy(accounts: &Accounts) -> CertificateRegistry {
    CertificateRegistry::deploy(DeploymentConfig::with_admin(accounts.admin))
}

/// Deploy, register University Alpha and University Beta, and have each
/// whitelist one student.
pub fn deploy_with_enrollment(accounts: &Accounts) -> CertificateRegistry {
    let registry = deploy(accounts);
    registry
        .register_issuer(&accounts.admin, accounts.university_1, "University Alpha")
        .expect("admin registers university 1");
    registry
        .register_issuer(&accounts.admin, accounts.university_2, "University Beta")
        .expect("admin registers university 2");
    registry
        .whitelist_recipient(&accounts.university_1, accounts.student_1)
        .expect("university 1 whitelists student 1");
    registry
        .whitelist_recipient(&accounts.university_2, accounts.student_2)
        .expect("university 2 whitelists student 2");
    registry
}

/// A computer science diploma from University Alpha.
pub fn alpha_diploma(recipient: Address, name: &str) -> IssueRequest {
    IssueRequest::new(
        recipient,
        "ipfs://QmAbCdEfGhIjKlMnOpQrStUvWxYz1234567890",
        name,
        "University Alpha",
        2025,
        "Computer Science",
    )
}

/// An engineering diploma from University Beta.
pub fn beta_diploma(recipient: Address, name: &str) -> IssueRequest {
    IssueRequest::new(
        recipient,
        "ipfs://QmZyXwVuTsRqAbCdEfGhIjKlMnOpQrStUvW",
        name,
        "University Beta",
        2025,
        "Engineering",
    )
}
