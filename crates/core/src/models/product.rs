//! Product and product variant entities.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId, VariantId};

/// A product, one row of the `shop.products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: String,
    /// URL path segment, unique across all products.
    pub slug: String,
    pub description: String,
    /// Path under `/static/images/`, if an image was uploaded.
    pub image: Option<String>,
    /// Display price. For products with weight variants this is the price
    /// of the default (first) variant.
    pub price: Price,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A weight option for a product, one row of `shop.product_variants`.
///
/// Dry food and litter sell in several package sizes; each size is a
/// variant with its own price. Products without variants sell as a single
/// unit at [`Product::price`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    /// Package weight in kilograms.
    pub weight: Decimal,
    pub price: Price,
    /// Sort key among a product's variants, smallest first.
    pub position: i32,
}
