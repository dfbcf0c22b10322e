//! Product repository with catalog filtering.
//!
//! The product list query is assembled dynamically from the active filters
//! with `QueryBuilder`, so each filter contributes its clause only when set.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use paws_core::models::{Product, ProductVariant};
use paws_core::{CategoryId, Price, ProductId};

use super::RepositoryError;

const PRODUCT_COLUMNS: &str =
    "p.id, p.category_id, p.name, p.slug, p.description, p.image, p.price, p.in_stock, \
     p.created_at, p.updated_at";

/// Sort orders accepted by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Newest first.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    NameAsc,
}

impl ProductSort {
    /// Parse the `sort` query parameter, falling back to newest-first.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            Some("name") => Self::NameAsc,
            _ => Self::Newest,
        }
    }

    const fn order_clause(self) -> &'static str {
        match self {
            Self::Newest => " ORDER BY p.created_at DESC, p.id DESC",
            Self::PriceAsc => " ORDER BY p.price ASC, p.id ASC",
            Self::PriceDesc => " ORDER BY p.price DESC, p.id ASC",
            Self::NameAsc => " ORDER BY p.name ASC, p.id ASC",
        }
    }
}

/// Active catalog filters for a product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Restrict to these categories. Empty means all categories.
    pub category_ids: Vec<CategoryId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Only products offering this weight variant (kilograms).
    pub weight: Option<Decimal>,
    pub in_stock_only: bool,
    pub sort: ProductSort,
    pub limit: i64,
    pub offset: i64,
}

/// Bounds for the storefront filter sidebar.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFacets {
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    /// Distinct variant weights across the catalog, ascending.
    pub weights: Vec<Decimal>,
}

/// Repository for reading products and variants.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
        if !filter.category_ids.is_empty() {
            let ids: Vec<i32> = filter.category_ids.iter().map(CategoryId::as_i32).collect();
            builder.push(" AND p.category_id = ANY(").push_bind(ids).push(")");
        }
        if let Some(min_price) = filter.min_price {
            builder.push(" AND p.price >= ").push_bind(min_price);
        }
        if let Some(max_price) = filter.max_price {
            builder.push(" AND p.price <= ").push_bind(max_price);
        }
        if let Some(weight) = filter.weight {
            builder
                .push(" AND EXISTS (SELECT 1 FROM shop.product_variants v ")
                .push("WHERE v.product_id = p.id AND v.weight = ")
                .push_bind(weight)
                .push(")");
        }
        if filter.in_stock_only {
            builder.push(" AND p.in_stock");
        }
    }

    /// List products matching the filter, paginated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut builder = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.products p WHERE TRUE"
        ));
        Self::push_filters(&mut builder, filter);
        builder.push(filter.sort.order_clause());
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
    pub async fn count(&self, filter: &ProductFilter) -> Result<i64, RepositoryError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM shop.products p WHERE TRUE");
        Self::push_filters(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(self.pool).await?;

        Ok(count)
    }

    /// Look up a product by its URL slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.products p WHERE p.slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
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

    /// Look up one variant of a product by weight.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_variant(
        &self,
        product_id: ProductId,
        weight: Decimal,
    ) -> Result<Option<ProductVariant>, RepositoryError> {
        let variant = sqlx::query_as::<_, ProductVariant>(
            r"
            SELECT id, product_id, weight, price, position
            FROM shop.product_variants
            WHERE product_id = $1 AND weight = $2
            ",
        )
        .bind(product_id)
        .bind(weight)
        .fetch_optional(self.pool)
        .await?;

        Ok(variant)
    }

    /// Price bounds and distinct weights for the filter sidebar.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn facets(&self) -> Result<ProductFacets, RepositoryError> {
        let (min_price, max_price) = sqlx::query_as::<_, (Option<Price>, Option<Price>)>(
            "SELECT MIN(price), MAX(price) FROM shop.products",
        )
        .fetch_one(self.pool)
        .await?;

        let weights = sqlx::query_scalar::<_, Decimal>(
            "SELECT DISTINCT weight FROM shop.product_variants ORDER BY weight",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(ProductFacets {
            min_price,
            max_price,
            weights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parsing() {
        assert_eq!(ProductSort::parse(Some("price_asc")), ProductSort::PriceAsc);
        assert_eq!(
            ProductSort::parse(Some("price_desc")),
            ProductSort::PriceDesc
        );
        assert_eq!(ProductSort::parse(Some("name")), ProductSort::NameAsc);
        assert_eq!(ProductSort::parse(Some("bogus")), ProductSort::Newest);
        assert_eq!(ProductSort::parse(None), ProductSort::Newest);
    }
}
