//! # Actix Middleware Library
//!
//! Unified middleware components for Around Actix services
//!
//! ## Modules
//! - `jwt_auth`: bearer-token authentication, exposes [`AuthenticatedUser`]
//! - `cors`: permissive CORS headers and `OPTIONS` short-circuit
//! - `logging`: access log with the authenticated username

pub mod cors;
pub mod jwt_auth;
pub mod logging;

pub use cors::PermissiveCors;
pub use jwt_auth::{AuthenticatedUser, JwtAuthMiddleware};
pub use logging::Logging;
