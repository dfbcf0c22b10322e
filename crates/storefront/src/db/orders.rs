//! Order repository.
//!
//! Order creation is transactional so an order row never exists without
//! its line items.

use rust_decimal::Decimal;
use sqlx::PgPool;

use paws_core::models::{Order, OrderItem};
use paws_core::{Email, OrderId, PickupPointId, Price, ProductId, UserId};

use super::RepositoryError;

const ORDER_COLUMNS: &str =
    "id, user_id, customer_name, email, phone, address, pickup_point_id, comment, \
     status, total, created_at, updated_at";

const ORDER_ITEM_COLUMNS: &str =
    "id, order_id, product_id, product_name, weight, unit_price, quantity";

/// Checkout payload for a new order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Option<UserId>,
    pub customer_name: String,
    pub email: Email,
    pub phone: String,
    pub address: Option<String>,
    pub pickup_point_id: Option<PickupPointId>,
    pub comment: Option<String>,
    pub total: Price,
    pub items: Vec<NewOrderItem>,
}

/// One line of a new order, snapshotted from the cart.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub weight: Option<Decimal>,
    pub unit_price: Price,
    pub quantity: i32,
}

/// Repository for customer orders.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order together with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement in the
    /// transaction fails.
    pub async fn create(&self, new_order: NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r"
            INSERT INTO shop.orders
                (user_id, customer_name, email, phone, address, pickup_point_id, comment, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(new_order.user_id)
        .bind(&new_order.customer_name)
        .bind(&new_order.email)
        .bind(&new_order.phone)
        .bind(&new_order.address)
        .bind(new_order.pickup_point_id)
        .bind(&new_order.comment)
        .bind(new_order.total)
        .fetch_one(&mut *tx)
        .await?;

        for item in &new_order.items {
            sqlx::query(
                r"
                INSERT INTO shop.order_items
                    (order_id, product_id, product_name, weight, unit_price, quantity)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(item.weight)
            .bind(item.unit_price)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order)
    }

    /// Orders placed by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// One order of a user, with its line items.
    ///
    /// Scoped by `user_id` so customers cannot read each other's orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<(Order, Vec<OrderItem>)>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = self.items_for(order.id).await?;
        Ok(Some((order, items)))
    }

    /// Line items of an order, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ORDER_ITEM_COLUMNS} FROM shop.order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}
