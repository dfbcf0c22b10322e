//! Product API routes.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;

use paws_core::models::Product;

use crate::db::ProductRepository;
use crate::routes::api::ApiError;
use crate::routes::products::{CatalogQuery, PER_PAGE};
use crate::state::AppState;

/// Response for the product listing.
#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// List products with the same filters the HTML catalog accepts.
///
/// GET /api/products
///
/// # Errors
///
/// Returns `ApiError` if a query fails.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let tree = state.category_tree().await?;
    let category_ids = query
        .category
        .as_deref()
        .and_then(|slug| tree.find_by_slug(slug))
        .map(|node| tree.subtree_ids(node.category.id))
        .unwrap_or_default();

    let repo = ProductRepository::new(state.pool());
    let filter = query.filter(category_ids);
    let products = repo.list(&filter).await?;
    let total = repo.count(&filter).await?;

    Ok(Json(ProductsResponse {
        products,
        total,
        page: query.page(),
        per_page: PER_PAGE,
    }))
}
