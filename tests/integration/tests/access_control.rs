//! Integration test: Authorization gates of the registry facade.
//!
//! Every rejected call must report its specific error kind and leave the
//! registry exactly as it was.

use std::sync::Arc;
use std::thread;

use diploma_core::{Address, RegistryError, Role};
use diploma_integration_tests::{alpha_diploma, deploy, deploy_with_enrollment, Accounts};
use diploma_registry::CertificateRegistry;

/// Observable state used to check that rejected calls change nothing.
#[derive(Debug, PartialEq)]
struct Snapshot {
    issuers: Vec<Address>,
    whitelisted: Vec<bool>,
    total_issued: u64,
}

fn snapshot(registry: &CertificateRegistry, acc: &Accounts) -> Snapshot {
    let everyone = [
        acc.admin,
        acc.university_1,
        acc.university_2,
        acc.student_1,
        acc.student_2,
        acc.general_user,
    ];
    Snapshot {
        issuers: registry.issuers(),
        whitelisted: everyone.iter().map(|a| registry.is_whitelisted(a)).collect(),
        total_issued: registry.total_issued(),
    }
}

// =========================================================================
// Admin role
// =========================================================================

#[test]
fn test_only_deployer_is_admin() {
    let acc = Accounts::new();
    let registry = deploy_with_enrollment(&acc);
    registry
        .issue_credential(&acc.university_1, alpha_diploma(acc.student_1, "John Doe"))
        .unwrap();

    assert!(registry.has_role(&acc.admin, Role::Admin));
    for other in [
        acc.university_1,
        acc.university_2,
        acc.student_1,
        acc.student_2,
        acc.general_user,
    ] {
        assert!(!registry.has_role(&other, Role::Admin));
    }
}

#[test]
fn test_non_admin_register_leaves_state_unchanged() {
    let acc = Accounts::new();
    let registry = deploy_with_enrollment(&acc);
    let before = snapshot(&registry, &acc);

    for caller in [
        acc.university_1,
        acc.student_1,
        acc.general_user,
    ] {
        let result = registry.register_issuer(&caller, acc.general_user, "Diploma Mill");
        assert_eq!(
            result,
            Err(RegistryError::Unauthorized {
                caller,
                required: Role::Admin,
            })
        );
    }

    assert_eq!(snapshot(&registry, &acc), before);
    assert!(!registry.has_role(&acc.general_user, Role::Issuer));
    assert!(registry.issuer_name(&acc.general_user).is_none());
}

#[test]
fn test_registration_grants_role_and_whitelist() {
    let acc = Accounts::new();
    let registry = deploy(&acc);
    registry
        .register_issuer(&acc.admin, acc.university_1, "University Alpha")
        .unwrap();

    assert!(registry.has_role(&acc.university_1, Role::Issuer));
    assert!(registry.is_whitelisted(&acc.university_1));
    assert_eq!(registry.issuers(), vec![acc.university_1]);
}

// =========================================================================
// Issuer role
// =========================================================================

#[test]
fn test_whitelisting_requires_issuer_role() {
    let acc = Accounts::new();
    let registry = deploy_with_enrollment(&acc);
    let before = snapshot(&registry, &acc);

    // A whitelisted student is not an issuer, and neither is the admin.
    for caller in [acc.general_user, acc.student_1, acc.admin] {
        let result = registry.whitelist_recipient(&caller, acc.general_user);
        assert_eq!(
            result,
            Err(RegistryError::Unauthorized {
                caller,
                required: Role::Issuer,
            })
        );
    }
    assert_eq!(snapshot(&registry, &acc), before);
}

#[test]
fn test_issuing_requires_issuer_role() {
    let acc = Accounts::new();
    let registry = deploy_with_enrollment(&acc);
    let before = snapshot(&registry, &acc);

    let result = registry.issue_credential(&acc.general_user, alpha_diploma(acc.student_1, "John Doe"));
    assert_eq!(result.unwrap_err().kind(), "unauthorized");
    assert_eq!(snapshot(&registry, &acc), before);
}

#[test]
fn test_issuing_to_never_approved_recipient() {
    let acc = Accounts::new();
    let registry = deploy_with_enrollment(&acc);

    let result =
        registry.issue_credential(&acc.university_1, alpha_diploma(acc.general_user, "Eve"));
    assert_eq!(result, Err(RegistryError::NotWhitelisted(acc.general_user)));
    assert_eq!(
        registry.get_holder_credential(&acc.general_user),
        Err(RegistryError::NoCredential(acc.general_user))
    );
}

#[test]
fn test_issuing_to_never_approved_zero_address() {
    let acc = Accounts::new();
    let registry = deploy_with_enrollment(&acc);

    let result = registry.issue_credential(&acc.university_1, alpha_diploma(Address::ZERO, "Nobody"));
    assert_eq!(result, Err(RegistryError::NotWhitelisted(Address::ZERO)));
    assert_eq!(registry.total_issued(), 0);
}

#[test]
fn test_issuing_to_whitelisted_zero_address() {
    let acc = Accounts::new();
    let registry = deploy_with_enrollment(&acc);
    registry
        .whitelist_recipient(&acc.university_1, Address::ZERO)
        .unwrap();

    let result = registry.issue_credential(&acc.university_1, alpha_diploma(Address::ZERO, "Nobody"));
    assert_eq!(result, Err(RegistryError::InvalidRecipient(Address::ZERO)));
    assert_eq!(registry.total_issued(), 0);
}

// =========================================================================
// Concurrency
// =========================================================================

#[test]
fn test_readers_run_alongside_issuance() {
    let acc = Accounts::new();
    let registry = Arc::new(deploy_with_enrollment(&acc));
    let students: Vec<Address> = (0x20u8..0x40).map(Address::repeat_byte).collect();
    for student in &students {
        registry
            .whitelist_recipient(&acc.university_1, *student)
            .unwrap();
    }

    let writer = {
        let registry = Arc::clone(&registry);
        let students = students.clone();
        let issuer = acc.university_1;
        thread::spawn(move || {
            for student in students {
                registry
                    .issue_credential(&issuer, alpha_diploma(student, "Student"))
                    .unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let students = students.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    for student in &students {
                        // A visible holder entry always points at a complete record.
                        if let Ok(id) = registry.get_holder_credential(student) {
                            let record = registry.get_record(id).unwrap();
                            assert_eq!(record.owner, *student);
                            assert!(record.verified);
                        }
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(registry.total_issued(), students.len() as u64);
}

#[test]
fn test_total_issued_never_runs_ahead_of_records() {
    let acc = Accounts::new();
    let registry = Arc::new(deploy_with_enrollment(&acc));
    let students: Vec<Address> = (0x40u8..0x80).map(Address::repeat_byte).collect();
    for student in &students {
        registry
            .whitelist_recipient(&acc.university_1, *student)
            .unwrap();
    }

    let writer = {
        let registry = Arc::clone(&registry);
        let students = students.clone();
        let issuer = acc.university_1;
        thread::spawn(move || {
            for student in students {
                registry
                    .issue_credential(&issuer, alpha_diploma(student, "Student"))
                    .unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let issuer = acc.university_1;
            thread::spawn(move || {
                for _ in 0..5_000 {
                    let total = registry.total_issued();
                    if total == 0 {
                        continue;
                    }
                    // Every counted credential is already readable.
                    let record = registry.get_record(total - 1).unwrap();
                    assert_eq!(record.credential_id, total - 1);
                    assert!(registry.credentials_issued_by(&issuer).len() as u64 >= total);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(registry.total_issued(), students.len() as u64);
}

#[test]
fn test_racing_issuers_certify_once() {
    let acc = Accounts::new();
    let registry = Arc::new(deploy_with_enrollment(&acc));

    let handles: Vec<_> = [acc.university_1, acc.university_2]
        .into_iter()
        .cycle()
        .take(10)
        .map(|issuer| {
            let registry = Arc::clone(&registry);
            let student = acc.student_1;
            thread::spawn(move || registry.issue_credential(&issuer, alpha_diploma(student, "John Doe")))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(registry.total_issued(), 1);
    assert_eq!(registry.get_holder_credential(&acc.student_1), Ok(0));
}
