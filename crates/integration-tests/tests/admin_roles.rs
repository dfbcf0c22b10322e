//! The role ladder the admin panel enforces, checked at the model level.
//!
//! Route-level enforcement (redirects and 403s) is covered by the HTTP
//! tests in `admin_http.rs`.

#![allow(clippy::unwrap_used)]

use paws_admin::models::CurrentAdmin;
use paws_core::{AdminRole, AdminUserId, Email};

fn admin_with_role(role: AdminRole) -> CurrentAdmin {
    CurrentAdmin {
        id: AdminUserId::new(1),
        email: Email::parse("ops@pawswhiskers.example").unwrap(),
        name: "Ops".to_owned(),
        role,
    }
}

#[test]
fn test_viewer_is_read_only() {
    let viewer = admin_with_role(AdminRole::Viewer);
    assert!(!viewer.can_edit());
    assert!(!viewer.is_super_admin());
}

#[test]
fn test_admin_edits_but_does_not_manage_accounts() {
    let admin = admin_with_role(AdminRole::Admin);
    assert!(admin.can_edit());
    assert!(!admin.is_super_admin());
}

#[test]
fn test_super_admin_does_everything() {
    let super_admin = admin_with_role(AdminRole::SuperAdmin);
    assert!(super_admin.can_edit());
    assert!(super_admin.is_super_admin());
}

#[test]
fn test_current_admin_round_trips_through_the_session() {
    // CurrentAdmin is stored in the session as JSON; a role must not
    // change in transit.
    let admin = admin_with_role(AdminRole::Admin);
    let json = serde_json::to_string(&admin).unwrap();
    let restored: CurrentAdmin = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.role, AdminRole::Admin);
    assert_eq!(restored.email, admin.email);
    assert_eq!(restored.name, admin.name);
}

#[test]
fn test_role_wire_names_match_the_database_codes() {
    for role in AdminRole::ALL {
        let parsed: AdminRole = role.as_str().parse().unwrap();
        assert_eq!(parsed, *role);
    }
    assert_eq!(AdminRole::SuperAdmin.as_str(), "super_admin");
}
