//! Quick-order repository, operator side.

use sqlx::PgPool;

use paws_core::models::QuickOrder;
use paws_core::{QuickOrderId, QuickOrderStatus};

use super::RepositoryError;

const QUICK_ORDER_COLUMNS: &str =
    "id, customer_name, phone, product_id, product_name, status, created_at, updated_at";

/// Repository for operating on callback requests.
pub struct QuickOrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> QuickOrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Quick orders newest first, optionally narrowed to one status, paginated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<QuickOrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QuickOrder>, RepositoryError> {
        let quick_orders = if let Some(status) = status {
            sqlx::query_as::<_, QuickOrder>(&format!(
                r"
                SELECT {QUICK_ORDER_COLUMNS} FROM shop.quick_orders
                WHERE status = $1
                ORDER BY created_at DESC, id DESC
                LIMIT $2 OFFSET $3
                "
            ))
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, QuickOrder>(&format!(
                r"
                SELECT {QUICK_ORDER_COLUMNS} FROM shop.quick_orders
                ORDER BY created_at DESC, id DESC
                LIMIT $1 OFFSET $2
                "
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?
        };

        Ok(quick_orders)
    }

    /// Count quick orders, optionally narrowed to one status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, status: Option<QuickOrderStatus>) -> Result<i64, RepositoryError> {
        let count = if let Some(status) = status {
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM shop.quick_orders WHERE status = $1",
            )
            .bind(status)
            .fetch_one(self.pool)
            .await?
        } else {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shop.quick_orders")
                .fetch_one(self.pool)
                .await?
        };

        Ok(count)
    }

    /// Assign a status to a quick order. Any assignment is allowed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the quick order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: QuickOrderId,
        status: QuickOrderStatus,
    ) -> Result<QuickOrder, RepositoryError> {
        let quick_order = sqlx::query_as::<_, QuickOrder>(&format!(
            r"
            UPDATE shop.quick_orders
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {QUICK_ORDER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        quick_order.ok_or(RepositoryError::NotFound)
    }
}
