//! Admin authentication service.
//!
//! Password-based login for admin accounts, Argon2id hashes. Accounts are
//! created by a super admin (or the CLI), never self-registered.

mod error;

pub use error::AdminAuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use paws_core::{AdminRole, Email};

use crate::db::{AdminUserRepository, NewAdminUser, RepositoryError};
use crate::models::AdminUser;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    admins: AdminUserRepository<'a>,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            admins: AdminUserRepository::new(pool),
        }
    }

    /// Login with email and password.
    ///
    /// Stamps `last_login_at` on success.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` if the email/password
    /// is wrong, `AdminAuthError::AccountDisabled` for a deactivated
    /// account with a correct password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminUser, AdminAuthError> {
        // Validate email format
        let email = Email::parse(email)?;

        // Get account with password hash
        let (admin, password_hash) = self
            .admins
            .get_password_hash(&email)
            .await?
            .ok_or(AdminAuthError::InvalidCredentials)?;

        // Verify password before revealing whether the account is disabled
        verify_password(password, &password_hash)?;

        if !admin.is_active {
            return Err(AdminAuthError::AccountDisabled);
        }

        self.admins.record_login(admin.id).await?;

        Ok(admin)
    }

    /// Create an admin account with a role.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AdminAuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AdminAuthError::EmailTaken` if the email is already registered.
    pub async fn create_admin(
        &self,
        email: &str,
        name: &str,
        role: AdminRole,
        password: &str,
    ) -> Result<AdminUser, AdminAuthError> {
        let email = Email::parse(email)?;

        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let admin = self
            .admins
            .create(NewAdminUser {
                email: &email,
                name,
                role,
                password_hash: &password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AdminAuthError::EmailTaken,
                other => AdminAuthError::Database(other),
            })?;

        Ok(admin)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AdminAuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AdminAuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AdminAuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AdminAuthError::PasswordHash(e.to_string()))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AdminAuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AdminAuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AdminAuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_short_password_rejected() {
        let err = validate_password("tooshort").unwrap_err();
        assert!(matches!(err, AdminAuthError::WeakPassword(_)));
        assert!(validate_password("a much longer admin password").is_ok());
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("operator passphrase").unwrap();
        assert!(hash.starts_with("$argon2"));

        assert!(verify_password("operator passphrase", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong passphrase", &hash),
            Err(AdminAuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_garbage_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("anything", "not a phc string"),
            Err(AdminAuthError::InvalidCredentials)
        ));
    }
}
