//! Filter facets API route.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;

use paws_core::catalog::FlatCategory;

use crate::db::ProductRepository;
use crate::routes::api::ApiError;
use crate::state::AppState;

/// Bounds and options for building a filter UI.
#[derive(Debug, Serialize)]
pub struct FiltersResponse {
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Distinct variant weights across the catalog, ascending.
    pub weights: Vec<Decimal>,
    pub categories: Vec<FlatCategory>,
}

/// Describe the available catalog filters.
///
/// GET /api/filters
///
/// # Errors
///
/// Returns `ApiError` if a query fails.
pub async fn list(State(state): State<AppState>) -> Result<Json<FiltersResponse>, ApiError> {
    let facets = ProductRepository::new(state.pool()).facets().await?;
    let tree = state.category_tree().await?;

    Ok(Json(FiltersResponse {
        min_price: facets.min_price.map(|p| p.amount()),
        max_price: facets.max_price.map(|p| p.amount()),
        weights: facets.weights,
        categories: tree.flatten(),
    }))
}
