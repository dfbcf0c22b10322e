//! Order repository, operator side.
//!
//! Status assignment is deliberately unconstrained: any order may be set
//! to any status, including backwards, so a warehouse mistake can be
//! undone without fighting a transition table.

use sqlx::PgPool;

use paws_core::models::{Order, OrderItem};
use paws_core::{OrderId, OrderStatus, PickupPointId};

use super::RepositoryError;

const ORDER_COLUMNS: &str =
    "id, user_id, customer_name, email, phone, address, pickup_point_id, comment, \
     status, total, created_at, updated_at";

const ORDER_ITEM_COLUMNS: &str =
    "id, order_id, product_id, product_name, weight, unit_price, quantity";

/// Repository for operating on customer orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Orders newest first, optionally narrowed to one status, paginated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, RepositoryError> {
        let orders = if let Some(status) = status {
            sqlx::query_as::<_, Order>(&format!(
                r"
                SELECT {ORDER_COLUMNS} FROM shop.orders
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
            sqlx::query_as::<_, Order>(&format!(
                r"
                SELECT {ORDER_COLUMNS} FROM shop.orders
                ORDER BY created_at DESC, id DESC
                LIMIT $1 OFFSET $2
                "
            ))
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?
        };

        Ok(orders)
    }

    /// Count orders, optionally narrowed to one status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, status: Option<OrderStatus>) -> Result<i64, RepositoryError> {
        let count = if let Some(status) = status {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shop.orders WHERE status = $1")
                .bind(status)
                .fetch_one(self.pool)
                .await?
        } else {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shop.orders")
                .fetch_one(self.pool)
                .await?
        };

        Ok(count)
    }

    /// Order counts grouped by status, for the dashboard.
    ///
    /// Statuses with no orders are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_by_status(&self) -> Result<Vec<(OrderStatus, i64)>, RepositoryError> {
        let counts = sqlx::query_as::<_, (OrderStatus, i64)>(
            "SELECT status, COUNT(*) FROM shop.orders GROUP BY status",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(counts)
    }

    /// One order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_with_items(
        &self,
        id: OrderId,
    ) -> Result<Option<(Order, Vec<OrderItem>)>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM shop.order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(order.id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some((order, items)))
    }

    /// City and address of a pickup point, for the order detail page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn pickup_point_label(
        &self,
        id: PickupPointId,
    ) -> Result<Option<String>, RepositoryError> {
        let label = sqlx::query_scalar::<_, String>(
            "SELECT city || ', ' || address FROM shop.pickup_points WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(label)
    }

    /// Assign a status to an order. Any assignment is allowed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            UPDATE shop.orders
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        order.ok_or(RepositoryError::NotFound)
    }
}
