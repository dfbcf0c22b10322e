//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - User registration and login (Argon2id passwords)
//! - `checkout` - Turning a session cart into a persisted order

pub mod auth;
pub mod checkout;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, CheckoutForm, CheckoutService};
