//! # Crypto Core
//!
//! Credential primitives shared by Around services.
//!
//! ## Modules
//! - `jwt`: HS256 token issuance and validation with an injected secret
//! - `password`: Argon2id password hashing and verification

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtError, JwtKeys};
pub use password::{hash_password, verify_password, PasswordError};
