//! Order, order item, and quick order entities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    Email, OrderId, OrderItemId, OrderStatus, PickupPointId, Price, ProductId, QuickOrderId,
    QuickOrderStatus, UserId,
};

/// A placed order, one row of the `shop.orders` table.
///
/// Contact details are snapshotted at checkout. `user_id` links the order
/// to an account when the customer was logged in; guest checkout leaves it
/// `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Order {
    pub id: OrderId,
    pub user_id: Option<UserId>,
    pub customer_name: String,
    pub email: Email,
    pub phone: String,
    /// Delivery address; `None` when picking up at a pickup point.
    pub address: Option<String>,
    pub pickup_point_id: Option<PickupPointId>,
    pub comment: Option<String>,
    pub status: OrderStatus,
    /// Sum of line totals at the time the order was placed.
    pub total: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of an order, a row of `shop.order_items`.
///
/// Name, weight, and unit price are snapshots; `product_id` is kept for
/// linking back to the catalog but goes `None` if the product is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    /// Package weight in kilograms, for products sold by weight variant.
    pub weight: Option<Decimal>,
    pub unit_price: Price,
    pub quantity: i32,
}

impl OrderItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price * u32::try_from(self.quantity).unwrap_or(0)
    }
}

/// A one-click callback request, one row of `shop.quick_orders`.
///
/// Quick orders carry only a name and phone number; an operator calls the
/// customer back to arrange the rest. When placed from a product page the
/// product is referenced too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct QuickOrder {
    pub id: QuickOrderId,
    pub customer_name: String,
    pub phone: String,
    pub product_id: Option<ProductId>,
    /// Product name snapshot, kept even if the product is later deleted.
    pub product_name: Option<String>,
    pub status: QuickOrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
