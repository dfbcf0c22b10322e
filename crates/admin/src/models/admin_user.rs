//! Admin user domain types.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use paws_core::{AdminUserId, Email};

pub use paws_core::AdminRole;

/// An admin panel account.
///
/// The password hash lives in the same table but is deliberately absent
/// here; it is only ever read by the login query. Deactivated accounts
/// keep their rows and simply stop being able to log in.
#[derive(Debug, Clone, FromRow)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Admin's email address, unique across the panel.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
    /// Admin's role/permission level.
    pub role: AdminRole,
    /// Whether the account may log in.
    pub is_active: bool,
    /// Last successful login, `None` if the account has never logged in.
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
    /// When the admin was last updated.
    pub updated_at: DateTime<Utc>,
}
