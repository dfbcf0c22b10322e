//! Pickup point repository.

use sqlx::PgPool;

use paws_core::PickupPointId;
use paws_core::models::PickupPoint;

use super::RepositoryError;

/// Repository for pickup locations offered at checkout.
pub struct PickupPointRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PickupPointRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All pickup points in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<PickupPoint>, RepositoryError> {
        let points = sqlx::query_as::<_, PickupPoint>(
            r"
            SELECT id, city, address, phone, position
            FROM shop.pickup_points
            ORDER BY position, city, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(points)
    }

    /// Look up one pickup point by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: PickupPointId,
    ) -> Result<Option<PickupPoint>, RepositoryError> {
        let point = sqlx::query_as::<_, PickupPoint>(
            r"
            SELECT id, city, address, phone, position
            FROM shop.pickup_points
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(point)
    }
}
