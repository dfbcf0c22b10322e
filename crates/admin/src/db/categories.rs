//! Category repository, writing side.
//!
//! The storefront reads the category tree; this repository is where rows
//! are created and deleted.

use sqlx::PgPool;

use paws_core::CategoryId;
use paws_core::models::Category;

use super::{RepositoryError, conflict_on_unique};

const CATEGORY_COLUMNS: &str = "id, name, slug, parent_id, position, created_at, updated_at";

/// Repository for managing the category catalog.
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
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM shop.categories ORDER BY position, id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Look up a single category by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM shop.categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// Create a category, appended after its siblings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        slug: &str,
        parent_id: Option<CategoryId>,
    ) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            r"
            INSERT INTO shop.categories (name, slug, parent_id, position)
            VALUES ($1, $2, $3, (
                SELECT COALESCE(MAX(position) + 1, 0)
                FROM shop.categories
                WHERE parent_id IS NOT DISTINCT FROM $3
            ))
            RETURNING {CATEGORY_COLUMNS}
            "
        ))
        .bind(name)
        .bind(slug)
        .bind(parent_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "slug already exists"))?;

        Ok(category)
    }

    /// Delete a category, keeping its subtree and products alive.
    ///
    /// Child categories are re-parented to the deleted node's parent (roots
    /// when there is none). Products are moved to the parent category; a
    /// root category that still has products cannot be deleted because
    /// products require a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    /// Returns `RepositoryError::Conflict` for a root category with products.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let parent_id = sqlx::query_scalar::<_, Option<CategoryId>>(
            "SELECT parent_id FROM shop.categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let product_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM shop.products WHERE category_id = $1",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if product_count > 0 {
            let Some(parent_id) = parent_id else {
                return Err(RepositoryError::Conflict(
                    "top-level category still has products; move them first".to_owned(),
                ));
            };

            sqlx::query(
                "UPDATE shop.products SET category_id = $2, updated_at = NOW() \
                 WHERE category_id = $1",
            )
            .bind(id)
            .bind(parent_id)
            .execute(&mut *tx)
            .await?;
        }

        // Children climb one level up before the node goes
        sqlx::query(
            "UPDATE shop.categories SET parent_id = $2, updated_at = NOW() WHERE parent_id = $1",
        )
        .bind(id)
        .bind(parent_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM shop.categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Number of categories in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_all(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shop.categories")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
