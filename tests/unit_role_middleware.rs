use slateboard::middleware::auth::AuthUser;
use slateboard::middleware::role::{check_any_role, check_role};
use slateboard_auth::claims::Claims;
use slateboard_models::users::UserRole;
use uuid::Uuid;

fn auth_user_with_role(role: &str) -> AuthUser {
    AuthUser(Claims {
        sub: Uuid::new_v4().to_string(),
        username: "testuser".to_string(),
        role: role.to_string(),
        exp: 9999999999,
        iat: 1234567890,
    })
}

#[test]
fn test_check_role_admin_passes() {
    let auth_user = auth_user_with_role("admin");
    assert!(check_role(&auth_user, UserRole::Admin).is_ok());
}

#[test]
fn test_check_role_rejects_other_roles() {
    for role in ["teacher", "student", "staff"] {
        let auth_user = auth_user_with_role(role);
        assert!(check_role(&auth_user, UserRole::Admin).is_err());
    }
}

#[test]
fn test_check_any_role_accepts_listed_roles() {
    let allowed = [UserRole::Admin, UserRole::Teacher];

    assert!(check_any_role(&auth_user_with_role("admin"), &allowed).is_ok());
    assert!(check_any_role(&auth_user_with_role("teacher"), &allowed).is_ok());
}

#[test]
fn test_check_any_role_rejects_unlisted_roles() {
    let allowed = [UserRole::Admin, UserRole::Teacher];

    assert!(check_any_role(&auth_user_with_role("student"), &allowed).is_err());
    assert!(check_any_role(&auth_user_with_role("staff"), &allowed).is_err());
}

#[test]
fn test_unknown_role_claim_rejected() {
    let auth_user = auth_user_with_role("superuser");

    assert!(check_role(&auth_user, UserRole::Admin).is_err());
    assert!(check_any_role(&auth_user, &[UserRole::Admin]).is_err());
    assert!(auth_user.role().is_err());
}

#[test]
fn test_role_accessor_parses_claims() {
    let auth_user = auth_user_with_role("staff");
    assert_eq!(auth_user.role().unwrap(), UserRole::Staff);
}
