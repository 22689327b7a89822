/// Integration tests for crypto-core token and password handling
///
/// This test module covers:
/// - Token issuance and validation round trip
/// - Rejection of tokens signed with another secret
/// - Rejection of malformed tokens
/// - Password hashes never equal the plaintext
use crypto_core::jwt::{JwtError, JwtKeys};
use crypto_core::password::{hash_password, verify_password};

const TEST_SECRET: &[u8] = b"integration-test-secret";

#[test]
fn test_issue_and_validate_round_trip() {
    let keys = JwtKeys::from_secret(TEST_SECRET).expect("keys");
    let token = keys.issue("bob_42").expect("token");

    let data = keys.validate(&token).expect("token should validate");
    assert_eq!(data.claims.username, "bob_42");
    assert!(data.claims.exp > data.claims.iat);
}

#[test]
fn test_token_from_other_secret_rejected() {
    let issuer = JwtKeys::from_secret(b"other-secret").expect("keys");
    let verifier = JwtKeys::from_secret(TEST_SECRET).expect("keys");

    let token = issuer.issue("bob_42").expect("token");
    assert!(matches!(verifier.validate(&token), Err(JwtError::Invalid(_))));
}

#[test]
fn test_malformed_token_rejected() {
    let keys = JwtKeys::from_secret(TEST_SECRET).expect("keys");
    assert!(matches!(keys.validate("not.a.token"), Err(JwtError::Invalid(_))));
    assert!(matches!(keys.validate(""), Err(JwtError::Invalid(_))));
}

#[test]
fn test_password_hash_is_not_plaintext() {
    let hash = hash_password("hunter2").expect("hash");
    assert_ne!(hash, "hunter2");
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("hunter2", &hash).expect("verify"));
}
