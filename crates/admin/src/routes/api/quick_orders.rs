//! Quick-order status API.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use paws_core::models::QuickOrder;
use paws_core::{QuickOrderId, QuickOrderStatus};

use crate::db::{QuickOrderRepository, RepositoryError};
use crate::middleware::RequireEditor;
use crate::routes::api::ApiError;
use crate::state::AppState;

/// Request body for a status update.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: QuickOrderStatus,
}

/// Assign a status to a quick order.
///
/// PATCH /api/quick-orders/{id}
///
/// Returns the updated quick order.
///
/// # Errors
///
/// Returns `ApiError` with 404 for unknown quick orders, 500 if the update
/// fails.
#[instrument(skip(state, admin, req))]
pub async fn set_status(
    RequireEditor(admin): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<SetStatusRequest>,
) -> Result<Json<QuickOrder>, ApiError> {
    let quick_order = QuickOrderRepository::new(state.pool())
        .update_status(QuickOrderId::new(id), req.status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::not_found("quick order not found"),
            other => other.into(),
        })?;

    tracing::info!(
        admin_id = admin.id.as_i32(),
        quick_order_id = quick_order.id.as_i32(),
        status = req.status.as_str(),
        "Quick order status updated via API"
    );

    Ok(Json(quick_order))
}
