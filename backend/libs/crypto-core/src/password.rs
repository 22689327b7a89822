/// Password hashing and verification using Argon2id
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hash a password using Argon2id with a random per-password salt.
///
/// Returns a PHC-formatted string safe to store in a document.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verify a password against a PHC-formatted hash.
///
/// A mismatch is `Ok(false)`; only a malformed hash or an internal Argon2
/// failure is an error.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash =
        PasswordHash::new(password_hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hash(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("secret").expect("should hash password");
        assert!(verify_password("secret", &hash).expect("should verify"));
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("secret").expect("should hash password");
        assert!(!verify_password("Secret", &hash).expect("verification should succeed"));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hash1 = hash_password("secret").expect("should hash");
        let hash2 = hash_password("secret").expect("should hash");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_plaintext_is_not_a_valid_hash() {
        let result = verify_password("secret", "secret");
        assert!(matches!(result, Err(PasswordError::InvalidHash(_))));
    }
}
