//! Database operations for the storefront.
//!
//! Both services share one `PostgreSQL` database split into schemas:
//!
//! - `shop` - categories, products, variants, orders, quick orders, reviews,
//!   pickup points (written mostly by the admin panel, read here)
//! - `storefront` - customer accounts (owned by this service)
//! - `tower_sessions` - server-side session storage
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

mod categories;
mod orders;
mod pickup_points;
mod products;
mod quick_orders;
mod reviews;
mod users;

pub use categories::CategoryRepository;
pub use orders::{NewOrder, NewOrderItem, OrderRepository};
pub use pickup_points::PickupPointRepository;
pub use products::{ProductFacets, ProductFilter, ProductRepository, ProductSort};
pub use quick_orders::QuickOrderRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;

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

    /// A uniqueness constraint was violated.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_errors_classify_as_corruption() {
        let err = sqlx::Error::ColumnDecode {
            index: "status".to_owned(),
            source: Box::<dyn std::error::Error + Send + Sync>::from("unknown status: soon"),
        };
        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::DataCorruption(msg) if msg.contains("status")
        ));

        let err = sqlx::Error::RowNotFound;
        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::Database(_)
        ));
    }
}
