//! Quick-order repository.

use sqlx::PgPool;

use paws_core::ProductId;
use paws_core::models::QuickOrder;

use super::RepositoryError;

const QUICK_ORDER_COLUMNS: &str =
    "id, customer_name, phone, product_id, product_name, status, created_at, updated_at";

/// Repository for one-tap callback requests.
pub struct QuickOrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> QuickOrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record a callback request, optionally tied to a product.
    ///
    /// The product name is snapshotted so the request stays readable even
    /// if the product is later deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        customer_name: &str,
        phone: &str,
        product_id: Option<ProductId>,
        product_name: Option<&str>,
    ) -> Result<QuickOrder, RepositoryError> {
        let quick_order = sqlx::query_as::<_, QuickOrder>(&format!(
            r"
            INSERT INTO shop.quick_orders (customer_name, phone, product_id, product_name)
            VALUES ($1, $2, $3, $4)
            RETURNING {QUICK_ORDER_COLUMNS}
            "
        ))
        .bind(customer_name)
        .bind(phone)
        .bind(product_id)
        .bind(product_name)
        .fetch_one(self.pool)
        .await?;

        Ok(quick_order)
    }
}
