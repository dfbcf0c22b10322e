//! Category API routes.

use axum::{Json, extract::State};
use serde::Serialize;

use paws_core::catalog::{CategoryNode, FlatCategory};

use crate::routes::api::ApiError;
use crate::state::AppState;

/// Response for the category listing.
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    /// Depth-first flat list, each row annotated with its level.
    pub categories: Vec<FlatCategory>,
    /// The same hierarchy in nested form.
    pub tree: Vec<CategoryNode>,
}

/// List all categories, flat and nested.
///
/// GET /api/categories
///
/// # Errors
///
/// Returns `ApiError` if the category tree cannot be loaded.
pub async fn list(State(state): State<AppState>) -> Result<Json<CategoriesResponse>, ApiError> {
    let tree = state.category_tree().await?;

    Ok(Json(CategoriesResponse {
        categories: tree.flatten(),
        tree: tree.roots.clone(),
    }))
}
