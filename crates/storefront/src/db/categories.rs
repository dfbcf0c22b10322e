//! Category repository.

use sqlx::PgPool;

use paws_core::models::Category;

use super::RepositoryError;

/// Repository for reading the category catalog.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories ordered for tree assembly: siblings by position, then id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug, parent_id, position, created_at, updated_at
            FROM shop.categories
            ORDER BY position, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }
}
