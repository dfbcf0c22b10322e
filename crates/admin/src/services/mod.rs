//! Business logic services for the admin panel.
//!
//! # Services
//!
//! - `auth` - Admin login and account creation (Argon2id passwords)

pub mod auth;

pub use auth::{AdminAuthError, AdminAuthService, MIN_PASSWORD_LENGTH};
