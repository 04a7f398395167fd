mod common;

use common::test_jwt_config;
use slateboard::config::jwt::JwtConfig;
use slateboard::utils::jwt::{
    create_access_token, create_refresh_token, verify_refresh_token, verify_token,
};
use slateboard_models::users::UserRole;
use uuid::Uuid;

#[test]
fn test_create_access_token_success() {
    let jwt_config = test_jwt_config();
    let user_id = Uuid::new_v4();

    let result = create_access_token(user_id, "jdoe", UserRole::Student, &jwt_config);

    assert!(result.is_ok());
    assert!(!result.unwrap().is_empty());
}

#[test]
fn test_verify_token_success() {
    let jwt_config = test_jwt_config();
    let user_id = Uuid::new_v4();

    let token = create_access_token(user_id, "jdoe", UserRole::Student, &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.username, "jdoe");
    assert_eq!(claims.role, "student");
}

#[test]
fn test_token_contains_correct_role_for_all_roles() {
    let jwt_config = test_jwt_config();

    for (role, slug) in [
        (UserRole::Admin, "admin"),
        (UserRole::Teacher, "teacher"),
        (UserRole::Student, "student"),
        (UserRole::Staff, "staff"),
    ] {
        let token = create_access_token(Uuid::new_v4(), "jdoe", role, &jwt_config).unwrap();
        let claims = verify_token(&token, &jwt_config).unwrap();
        assert_eq!(claims.role, slug);
    }
}

#[test]
fn test_verify_token_invalid() {
    let jwt_config = test_jwt_config();

    assert!(verify_token("invalid.token.here", &jwt_config).is_err());
    assert!(verify_token("", &jwt_config).is_err());
}

#[test]
fn test_verify_token_wrong_secret() {
    let jwt_config = test_jwt_config();
    let token =
        create_access_token(Uuid::new_v4(), "jdoe", UserRole::Student, &jwt_config).unwrap();

    let wrong_jwt_config = JwtConfig {
        secret: "different_secret_key".to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 604800,
    };

    assert!(verify_token(&token, &wrong_jwt_config).is_err());
}

#[test]
fn test_token_expiry_is_set() {
    let jwt_config = test_jwt_config();
    let token =
        create_access_token(Uuid::new_v4(), "jdoe", UserRole::Student, &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert!(claims.exp > claims.iat);
    assert_eq!(
        claims.exp - claims.iat,
        jwt_config.access_token_expiry as usize
    );
}

#[test]
fn test_refresh_token_round_trip() {
    let jwt_config = test_jwt_config();
    let user_id = Uuid::new_v4();

    let token = create_refresh_token(user_id, &jwt_config).unwrap();
    let claims = verify_refresh_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.token_type, "refresh");
}

#[test]
fn test_access_token_rejected_as_refresh_token() {
    let jwt_config = test_jwt_config();
    let token =
        create_access_token(Uuid::new_v4(), "jdoe", UserRole::Student, &jwt_config).unwrap();

    assert!(verify_refresh_token(&token, &jwt_config).is_err());
}

#[test]
fn test_verify_token_malformed() {
    let jwt_config = test_jwt_config();
    let malformed_tokens = vec![
        "not.enough",
        "too.many.parts.here.extra",
        "!!!.invalid.chars",
        "header.payload.",
        ".payload.signature",
    ];

    for token in malformed_tokens {
        assert!(verify_token(token, &jwt_config).is_err());
    }
}

#[test]
fn test_create_token_different_users_different_tokens() {
    let jwt_config = test_jwt_config();
    let user_id1 = Uuid::new_v4();
    let user_id2 = Uuid::new_v4();

    let token1 = create_access_token(user_id1, "user1", UserRole::Student, &jwt_config).unwrap();
    let token2 = create_access_token(user_id2, "user2", UserRole::Student, &jwt_config).unwrap();

    assert_ne!(token1, token2);

    let claims1 = verify_token(&token1, &jwt_config).unwrap();
    let claims2 = verify_token(&token2, &jwt_config).unwrap();

    assert_eq!(claims1.sub, user_id1.to_string());
    assert_eq!(claims2.sub, user_id2.to_string());
}
