/// HS256 token issuance and validation
///
/// The signing secret is process-wide configuration: it is read once at
/// startup, wrapped in [`JwtKeys`], and shared read-only with both the login
/// handler (issuing) and the authentication middleware (validating).
///
/// ## Usage
///
/// ```rust
/// use crypto_core::jwt::JwtKeys;
///
/// let keys = JwtKeys::from_secret(b"change-me").expect("non-empty secret");
/// let token = keys.issue("alice").expect("token");
/// let data = keys.validate(&token).expect("valid token");
/// assert_eq!(data.claims.username, "alice");
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, TokenData,
    Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Tokens expire 24 hours after issuance
pub const TOKEN_EXPIRY_HOURS: i64 = 24;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

/// Claims carried by an Around bearer token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Authenticated username
    pub username: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT signing secret must not be empty")]
    EmptySecret,
    #[error("failed to sign token: {0}")]
    Signing(String),
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
}

// ============================================================================
// Keys
// ============================================================================

/// Signing and verification keys derived from the shared secret
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys").finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::EmptySecret);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        })
    }

    /// Issue a token for `username` that expires in [`TOKEN_EXPIRY_HOURS`].
    pub fn issue(&self, username: &str) -> Result<String, JwtError> {
        self.issue_with_ttl(username, Duration::hours(TOKEN_EXPIRY_HOURS))
    }

    pub fn issue_with_ttl(&self, username: &str, ttl: Duration) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| JwtError::Signing(e.to_string()))
    }

    /// Verify signature and expiry, returning the decoded claims.
    pub fn validate(&self, token: &str) -> Result<TokenData<Claims>, JwtError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Invalid(e.to_string()),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
