//! Checkout service.
//!
//! Validates the checkout form, prices the cart, and persists the order.
//! Line items snapshot the product name and unit price at purchase time, so
//! later catalog edits never rewrite order history.

use sqlx::PgPool;
use thiserror::Error;

use paws_core::collection::Collection;
use paws_core::models::Order;
use paws_core::{Email, PickupPointId, UserId};

use crate::db::{NewOrder, NewOrderItem, OrderRepository, PickupPointRepository, RepositoryError};

/// Checkout form fields as submitted by the customer.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    /// Street address for courier delivery.
    pub address: Option<String>,
    /// Selected pickup point, mutually exclusive with `address`. Arrives as
    /// a string because the dropdown's delivery choice submits an empty
    /// value.
    pub pickup_point_id: Option<String>,
    pub comment: Option<String>,
}

impl CheckoutForm {
    /// The selected pickup point id, if one parses out of the raw field.
    #[must_use]
    pub fn pickup_point(&self) -> Option<PickupPointId> {
        self.pickup_point_id
            .as_deref()
            .and_then(|v| v.trim().parse::<i32>().ok())
            .map(PickupPointId::new)
    }
}

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The session cart has no items.
    #[error("your cart is empty")]
    EmptyCart,

    /// A form field failed validation; the message is shown to the customer.
    #[error("{0}")]
    Validation(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),
}

/// Service that turns a session cart into a persisted order.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
}

impl<'a> CheckoutService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Validate the form and create the order from the cart contents.
    ///
    /// `user_id` links the order to an account when the customer is logged
    /// in; guests order with `None`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` for an empty cart,
    /// `CheckoutError::Validation` for bad form input, and
    /// `CheckoutError::Database` if persisting fails.
    pub async fn place_order(
        &self,
        user_id: Option<UserId>,
        cart: &Collection,
        form: &CheckoutForm,
    ) -> Result<Order, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let customer_name = required_field(&form.customer_name, "name")?;
        let phone = required_field(&form.phone, "phone")?;
        let email = Email::parse(&form.email)
            .map_err(|e| CheckoutError::Validation(format!("invalid email: {e}")))?;

        let address = form
            .address
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        // Pickup wins when both are somehow submitted; the form disables the
        // address field in pickup mode.
        let pickup_point_id = match form.pickup_point() {
            Some(id) => {
                PickupPointRepository::new(self.pool)
                    .get_by_id(id)
                    .await?
                    .ok_or_else(|| {
                        CheckoutError::Validation("unknown pickup point selected".to_owned())
                    })?;
                Some(id)
            }
            None => None,
        };

        if pickup_point_id.is_none() && address.is_none() {
            return Err(CheckoutError::Validation(
                "a delivery address or pickup point is required".to_owned(),
            ));
        }

        let items = order_lines(cart);

        let comment = form
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let order = OrderRepository::new(self.pool)
            .create(NewOrder {
                user_id,
                customer_name,
                email,
                phone,
                address: if pickup_point_id.is_some() {
                    None
                } else {
                    address
                },
                pickup_point_id,
                comment,
                total: cart.total(),
                items,
            })
            .await?;

        Ok(order)
    }
}

fn required_field(value: &str, label: &str) -> Result<String, CheckoutError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CheckoutError::Validation(format!("{label} is required")));
    }
    Ok(trimmed.to_owned())
}

/// Turn cart lines into order line items, snapshotting name and unit price.
fn order_lines(cart: &Collection) -> Vec<NewOrderItem> {
    cart.items()
        .iter()
        .map(|item| NewOrderItem {
            product_id: Some(item.product_id),
            product_name: item.name.clone(),
            weight: item.weight,
            unit_price: item.price,
            quantity: i32::try_from(item.quantity).unwrap_or(i32::MAX),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field_trims() {
        assert_eq!(required_field("  Anna  ", "name").unwrap(), "Anna");
        assert!(matches!(
            required_field("   ", "name"),
            Err(CheckoutError::Validation(msg)) if msg == "name is required"
        ));
    }

    #[test]
    fn test_pickup_point_parses_leniently() {
        let mut form = CheckoutForm {
            customer_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: None,
            pickup_point_id: Some(" 3 ".to_owned()),
            comment: None,
        };
        assert_eq!(form.pickup_point(), Some(PickupPointId::new(3)));

        // The delivery choice submits an empty value
        form.pickup_point_id = Some(String::new());
        assert_eq!(form.pickup_point(), None);

        form.pickup_point_id = Some("soon".to_owned());
        assert_eq!(form.pickup_point(), None);
    }

    #[test]
    fn test_order_lines_snapshot_the_cart() {
        use paws_core::collection::{CollectionKind, ItemSnapshot};
        use paws_core::{Price, ProductId};
        use rust_decimal::Decimal;

        let mut cart = CollectionKind::Cart.empty();
        cart.add(
            ItemSnapshot {
                product_id: ProductId::new(7),
                name: "Salmon feast".to_owned(),
                price: Price::new(Decimal::new(1250, 2)),
                image: None,
                weight: Some(Decimal::new(4, 1)),
            },
            2,
        );
        cart.add(
            ItemSnapshot {
                product_id: ProductId::new(9),
                name: "Rope toy".to_owned(),
                price: Price::new(Decimal::new(399, 2)),
                image: None,
                weight: None,
            },
            1,
        );

        let lines = order_lines(&cart);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, Some(ProductId::new(7)));
        assert_eq!(lines[0].product_name, "Salmon feast");
        assert_eq!(lines[0].weight, Some(Decimal::new(4, 1)));
        assert_eq!(lines[0].unit_price, Price::new(Decimal::new(1250, 2)));
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[1].weight, None);
        assert_eq!(lines[1].quantity, 1);
    }
}
