//! User domain types.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use paws_core::{Email, UserId};

/// A registered customer.
///
/// The password hash lives in the same table but is deliberately absent
/// here; it is only ever read by the login query.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address, unique across the shop.
    pub email: Email,
    /// Display name shown in the header and on orders.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
