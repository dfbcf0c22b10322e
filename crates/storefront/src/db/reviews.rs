//! Review repository.
//!
//! The storefront only ever reads approved reviews. New submissions land
//! in `pending` and stay invisible until a moderator approves them.

use sqlx::PgPool;

use paws_core::models::Review;
use paws_core::{ProductId, ReviewStatus};

use super::RepositoryError;

const REVIEW_COLUMNS: &str =
    "id, product_id, author_name, rating, body, status, created_at, updated_at";

/// Repository for customer reviews.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Approved reviews, newest first, optionally scoped to one product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_approved(
        &self,
        product_id: Option<ProductId>,
    ) -> Result<Vec<Review>, RepositoryError> {
        let reviews = if let Some(product_id) = product_id {
            sqlx::query_as::<_, Review>(&format!(
                r"
                SELECT {REVIEW_COLUMNS} FROM shop.reviews
                WHERE status = $1 AND product_id = $2
                ORDER BY created_at DESC
                "
            ))
            .bind(ReviewStatus::Approved)
            .bind(product_id)
            .fetch_all(self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Review>(&format!(
                r"
                SELECT {REVIEW_COLUMNS} FROM shop.reviews
                WHERE status = $1
                ORDER BY created_at DESC
                "
            ))
            .bind(ReviewStatus::Approved)
            .fetch_all(self.pool)
            .await?
        };

        Ok(reviews)
    }

    /// Submit a review; it starts out pending moderation.
    ///
    /// The rating is clamped to the valid range before insert.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_pending(
        &self,
        product_id: Option<ProductId>,
        author_name: &str,
        rating: i32,
        body: &str,
    ) -> Result<Review, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(&format!(
            r"
            INSERT INTO shop.reviews (product_id, author_name, rating, body)
            VALUES ($1, $2, $3, $4)
            RETURNING {REVIEW_COLUMNS}
            "
        ))
        .bind(product_id)
        .bind(author_name)
        .bind(Review::clamp_rating(rating))
        .bind(body)
        .fetch_one(self.pool)
        .await?;

        Ok(review)
    }
}
