//! HTTP middleware stack for the admin panel.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (correlation across logs and Sentry)
//! 4. Session layer (tower-sessions with `PostgreSQL` store)
//! 5. Security headers (stricter CSP than the storefront)
//!
//! Authentication is enforced per handler through the extractors in
//! [`auth`], not as a router-level guard.

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    OptionalAdminAuth, RequireAdminAuth, RequireEditor, RequireSuperAdmin, clear_current_admin,
    set_current_admin,
};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
