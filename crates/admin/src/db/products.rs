//! Product repository, writing side.
//!
//! Covers the product listing with its admin filters plus the create,
//! edit, and delete operations the storefront never performs. Variants are
//! replaced wholesale on save; the edit form submits the complete list.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use paws_core::models::{Product, ProductVariant};
use paws_core::{CategoryId, Price, ProductId};

use super::{RepositoryError, conflict_on_unique};

const PRODUCT_COLUMNS: &str =
    "p.id, p.category_id, p.name, p.slug, p.description, p.image, p.price, p.in_stock, \
     p.created_at, p.updated_at";

/// Filters for the admin product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductListFilter {
    pub category_id: Option<CategoryId>,
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Payload shared by product create and update.
#[derive(Debug, Clone)]
pub struct NewProduct<'a> {
    pub category_id: CategoryId,
    pub name: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub image: Option<&'a str>,
    pub price: Price,
    pub in_stock: bool,
}

/// Repository for managing products and their variants.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductListFilter) {
        if let Some(category_id) = filter.category_id {
            builder.push(" AND p.category_id = ").push_bind(category_id);
        }
        if let Some(ref search) = filter.search {
            builder
                .push(" AND p.name ILIKE ")
                .push_bind(format!("%{search}%"));
        }
    }

    /// List products matching the filter, newest first, paginated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductListFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.products p WHERE TRUE"
        ));
        Self::push_filters(&mut builder, filter);
        builder.push(" ORDER BY p.created_at DESC, p.id DESC");
        builder
            .push(" LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let products = builder
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Count products matching the filter, ignoring pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, filter: &ProductListFilter) -> Result<i64, RepositoryError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM shop.products p WHERE TRUE");
        Self::push_filters(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(self.pool).await?;

        Ok(count)
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.products p WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Weight variants for a product, in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn variants_for(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductVariant>, RepositoryError> {
        let variants = sqlx::query_as::<_, ProductVariant>(
            r"
            SELECT id, product_id, weight, price, position
            FROM shop.product_variants
            WHERE product_id = $1
            ORDER BY position, weight
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(variants)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_product: NewProduct<'_>) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO shop.products
                (category_id, name, slug, description, image, price, in_stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(new_product.category_id)
        .bind(new_product.name)
        .bind(new_product.slug)
        .bind(new_product.description)
        .bind(new_product.image)
        .bind(new_product.price)
        .bind(new_product.in_stock)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "slug already exists"))?;

        Ok(product)
    }

    /// Update a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if the slug is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        fields: NewProduct<'_>,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE shop.products
            SET category_id = $2, name = $3, slug = $4, description = $5,
                image = $6, price = $7, in_stock = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(fields.category_id)
        .bind(fields.name)
        .bind(fields.slug)
        .bind(fields.description)
        .bind(fields.image)
        .bind(fields.price)
        .bind(fields.in_stock)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "slug already exists"))?;

        product.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product. Variants cascade; order lines keep their snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Replace a product's variant list in one transaction.
    ///
    /// Positions follow the order of the given `(weight, price)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement in the
    /// transaction fails.
    pub async fn replace_variants(
        &self,
        product_id: ProductId,
        variants: &[(Decimal, Price)],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM shop.product_variants WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        for (position, (weight, price)) in variants.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO shop.product_variants (product_id, weight, price, position)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(product_id)
            .bind(weight)
            .bind(price)
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Number of products in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_all(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shop.products")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
