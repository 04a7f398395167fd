use slateboard::utils::password::{hash_password, verify_password};

#[test]
fn test_hash_password_produces_bcrypt_hash() {
    let hash = hash_password("secret123").unwrap();

    assert_ne!(hash, "secret123");
    assert!(hash.starts_with("$2"));
}

#[test]
fn test_verify_password_correct() {
    let hash = hash_password("secret123").unwrap();
    assert!(verify_password("secret123", &hash).unwrap());
}

#[test]
fn test_verify_password_incorrect() {
    let hash = hash_password("secret123").unwrap();
    assert!(!verify_password("wrong-password", &hash).unwrap());
}

#[test]
fn test_hashes_are_salted() {
    let hash1 = hash_password("secret123").unwrap();
    let hash2 = hash_password("secret123").unwrap();

    assert_ne!(hash1, hash2);
    assert!(verify_password("secret123", &hash1).unwrap());
    assert!(verify_password("secret123", &hash2).unwrap());
}

#[test]
fn test_verify_password_garbage_hash_errors() {
    assert!(verify_password("secret123", "not-a-bcrypt-hash").is_err());
}
