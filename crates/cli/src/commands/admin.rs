//! Admin account management command.
//!
//! Creates the first account on a fresh install; later accounts are
//! usually created by a super admin inside the panel itself.
//!
//! ```bash
//! paws-cli admin create -e owner@example.com -n "Store Owner" -r super_admin -p <password>
//! ```

use thiserror::Error;

use paws_admin::db;
use paws_admin::services::{AdminAuthError, AdminAuthService};
use paws_core::AdminRole;

use super::CliError;

/// Errors that can occur while creating an account.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Cli(#[from] CliError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid role: {0} (valid roles: super_admin, admin, viewer)")]
    InvalidRole(String),

    #[error(transparent)]
    Auth(#[from] AdminAuthError),
}

/// Create an admin panel account.
///
/// # Errors
///
/// Returns an error for an unknown role, a malformed email, a password
/// shorter than the minimum, or an email that already has an account.
pub async fn create(
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> Result<i32, AdminError> {
    let role: AdminRole = role
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))?;

    let database_url = super::database_url()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Creating admin account: {} ({})", email, role.as_str());
    let admin = AdminAuthService::new(&pool)
        .create_admin(email, name, role, password)
        .await?;

    tracing::info!(
        "Admin account created: id={}, email={}, role={}",
        admin.id.as_i32(),
        admin.email,
        admin.role.as_str()
    );

    Ok(admin.id.as_i32())
}
