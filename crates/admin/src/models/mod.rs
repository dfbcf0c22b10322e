//! Domain models for the admin panel.

pub mod admin_user;
pub mod session;

pub use admin_user::AdminUser;
pub use session::CurrentAdmin;
pub use session::keys as session_keys;
