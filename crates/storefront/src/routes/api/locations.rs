//! Pickup point API route.

use axum::{Json, extract::State};

use paws_core::models::PickupPoint;

use crate::db::PickupPointRepository;
use crate::routes::api::ApiError;
use crate::state::AppState;

/// List pickup points in display order.
///
/// GET /api/locations
///
/// # Errors
///
/// Returns `ApiError` if the query fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PickupPoint>>, ApiError> {
    let points = PickupPointRepository::new(state.pool()).list_all().await?;
    Ok(Json(points))
}
