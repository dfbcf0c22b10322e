//! Pickup point entity.

use serde::{Deserialize, Serialize};

use crate::types::PickupPointId;

/// A store or partner location where orders can be collected, one row of
/// the `shop.pickup_points` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct PickupPoint {
    pub id: PickupPointId,
    pub city: String,
    pub address: String,
    pub phone: Option<String>,
    /// Sort key for the checkout dropdown, smallest first.
    pub position: i32,
}
