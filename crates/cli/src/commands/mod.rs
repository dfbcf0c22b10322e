//! CLI subcommand implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use thiserror::Error;

/// Errors shared by every subcommand.
#[derive(Debug, Error)]
pub enum CliError {
    /// No database connection string in the environment.
    #[error("set PAWS_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
}

/// Read the database connection string the same way the servers do:
/// `PAWS_DATABASE_URL` first, then `DATABASE_URL`.
pub fn database_url() -> Result<SecretString, CliError> {
    dotenvy::dotenv().ok();

    std::env::var("PAWS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CliError::MissingDatabaseUrl)
}
