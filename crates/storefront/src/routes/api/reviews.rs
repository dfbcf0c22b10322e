//! Review API route.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use paws_core::ProductId;
use paws_core::models::Review;

use crate::db::ReviewRepository;
use crate::routes::api::ApiError;
use crate::state::AppState;

/// Query parameters for the approved review listing.
#[derive(Debug, Deserialize)]
pub struct ApprovedQuery {
    /// Restrict to one product's reviews.
    pub product_id: Option<i32>,
}

/// List approved reviews, newest first.
///
/// GET /api/reviews/approved
///
/// # Errors
///
/// Returns `ApiError` if the query fails.
pub async fn approved(
    State(state): State<AppState>,
    Query(query): Query<ApprovedQuery>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = ReviewRepository::new(state.pool())
        .list_approved(query.product_id.map(ProductId::new))
        .await?;

    Ok(Json(reviews))
}
