//! Customer review entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, ReviewId, ReviewStatus};

/// A customer review, one row of the `shop.reviews` table.
///
/// Reviews are born [`ReviewStatus::Pending`] and appear on the storefront
/// only after an admin approves them. `product_id` is `None` for general
/// shop reviews left on the reviews page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Review {
    pub id: ReviewId,
    pub product_id: Option<ProductId>,
    pub author_name: String,
    /// Star rating, clamped to [`Review::MIN_RATING`]..=[`Review::MAX_RATING`].
    pub rating: i32,
    pub body: String,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub const MIN_RATING: i32 = 1;
    pub const MAX_RATING: i32 = 5;

    /// Clamp a submitted rating into the valid star range.
    #[must_use]
    pub const fn clamp_rating(rating: i32) -> i32 {
        if rating < Self::MIN_RATING {
            Self::MIN_RATING
        } else if rating > Self::MAX_RATING {
            Self::MAX_RATING
        } else {
            rating
        }
    }
}
