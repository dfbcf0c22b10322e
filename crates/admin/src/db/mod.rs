//! Database operations for the admin panel.
//!
//! The admin shares one `PostgreSQL` database with the storefront and is
//! the writing side of the `shop` schema (catalog, orders, reviews); the
//! `admin` schema (admin accounts) is owned here outright.
//!
//! Queries are written as runtime `query_as`/`query` calls bound to the row
//! structs in `paws-core`, so the crate builds without a live database.
//!
//! # Migrations
//!
//! Migrations live in the repository root `migrations/` directory and run via:
//! ```bash
//! cargo run -p paws-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

mod admin_users;
mod categories;
mod orders;
mod products;
mod quick_orders;
mod reviews;

pub use admin_users::{AdminUserRepository, NewAdminUser};
pub use categories::CategoryRepository;
pub use orders::OrderRepository;
pub use products::{NewProduct, ProductListFilter, ProductRepository};
pub use quick_orders::QuickOrderRepository;
pub use reviews::ReviewRepository;

/// Errors returned by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// A stored value no longer parses into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The targeted row does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness or reference constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for RepositoryError {
    /// Decode failures mean a stored value no longer parses into its domain
    /// type (a status or email mangled outside the application), which is a
    /// different incident than the database being unreachable.
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::ColumnDecode { index, source } => {
                Self::DataCorruption(format!("column {index}: {source}"))
            }
            sqlx::Error::Decode(source) => Self::DataCorruption(source.to_string()),
            other => Self::Database(other),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique violation onto `Conflict`, leaving other errors as `Database`.
fn conflict_on_unique(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::from(e)
}
