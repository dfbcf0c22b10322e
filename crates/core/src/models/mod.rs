//! Entity structs shared by the storefront and the admin panel.
//!
//! Both services read the same `shop` schema, so the row shapes live here
//! rather than being duplicated per service. Each struct mirrors one table;
//! assembly into richer shapes (category trees, orders with their items)
//! happens in [`crate::catalog`] and in the service repositories.

mod category;
mod order;
mod pickup;
mod product;
mod review;

pub use category::Category;
pub use order::{Order, OrderItem, QuickOrder};
pub use pickup::PickupPoint;
pub use product::{Product, ProductVariant};
pub use review::Review;
