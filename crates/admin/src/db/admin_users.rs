//! Admin user repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use paws_core::{AdminRole, AdminUserId, Email};

use super::{RepositoryError, conflict_on_unique};
use crate::models::AdminUser;

const ADMIN_USER_COLUMNS: &str =
    "id, email, name, role, is_active, last_login_at, created_at, updated_at";

/// Payload for creating an admin account.
#[derive(Debug, Clone)]
pub struct NewAdminUser<'a> {
    pub email: &'a Email,
    pub name: &'a str,
    pub role: AdminRole,
    pub password_hash: &'a str,
}

/// Repository for admin panel accounts.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All admin accounts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<AdminUser>, RepositoryError> {
        let admins = sqlx::query_as::<_, AdminUser>(&format!(
            "SELECT {ADMIN_USER_COLUMNS} FROM admin.admin_users ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(admins)
    }

    /// Look up an admin account by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: AdminUserId) -> Result<Option<AdminUser>, RepositoryError> {
        let admin = sqlx::query_as::<_, AdminUser>(&format!(
            "SELECT {ADMIN_USER_COLUMNS} FROM admin.admin_users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(admin)
    }

    /// Create an admin account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_admin: NewAdminUser<'_>) -> Result<AdminUser, RepositoryError> {
        let admin = sqlx::query_as::<_, AdminUser>(&format!(
            r"
            INSERT INTO admin.admin_users (email, name, role, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING {ADMIN_USER_COLUMNS}
            "
        ))
        .bind(new_admin.email)
        .bind(new_admin.name)
        .bind(new_admin.role)
        .bind(new_admin.password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email already exists"))?;

        Ok(admin)
    }

    /// Get an admin account and its password hash by email, for login.
    ///
    /// Returns `None` if no account has this email. Inactive accounts are
    /// returned too; the auth service decides how to reject them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(AdminUser, String)>, RepositoryError> {
        type Row = (
            i32,
            Email,
            String,
            AdminRole,
            bool,
            Option<DateTime<Utc>>,
            DateTime<Utc>,
            DateTime<Utc>,
            String,
        );

        let row = sqlx::query_as::<_, Row>(&format!(
            "SELECT {ADMIN_USER_COLUMNS}, password_hash FROM admin.admin_users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        let Some((id, email, name, role, is_active, last_login_at, created_at, updated_at, hash)) =
            row
        else {
            return Ok(None);
        };

        let admin = AdminUser {
            id: AdminUserId::new(id),
            email,
            name,
            role,
            is_active,
            last_login_at,
            created_at,
            updated_at,
        };

        Ok(Some((admin, hash)))
    }

    /// Stamp a successful login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn record_login(&self, id: AdminUserId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE admin.admin_users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Enable or disable an account.
    ///
    /// Disabled accounts keep their row but fail login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_active(
        &self,
        id: AdminUserId,
        is_active: bool,
    ) -> Result<AdminUser, RepositoryError> {
        let admin = sqlx::query_as::<_, AdminUser>(&format!(
            r"
            UPDATE admin.admin_users
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {ADMIN_USER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(is_active)
        .fetch_optional(self.pool)
        .await?;

        admin.ok_or(RepositoryError::NotFound)
    }
}
