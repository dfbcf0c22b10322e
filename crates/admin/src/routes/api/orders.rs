//! Order status API.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use paws_core::models::Order;
use paws_core::{OrderId, OrderStatus};

use crate::db::{OrderRepository, RepositoryError};
use crate::middleware::RequireEditor;
use crate::routes::api::ApiError;
use crate::state::AppState;

/// Request body for a status update.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: OrderStatus,
}

/// Assign a status to an order.
///
/// PATCH /api/orders/{id}
///
/// Any status may be assigned, including backwards. Returns the updated
/// order.
///
/// # Errors
///
/// Returns `ApiError` with 404 for unknown orders, 500 if the update fails.
#[instrument(skip(state, admin, req))]
pub async fn set_status(
    RequireEditor(admin): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<SetStatusRequest>,
) -> Result<Json<Order>, ApiError> {
    let order = OrderRepository::new(state.pool())
        .update_status(OrderId::new(id), req.status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::not_found("order not found"),
            other => other.into(),
        })?;

    tracing::info!(
        admin_id = admin.id.as_i32(),
        order_id = order.id.as_i32(),
        status = req.status.as_str(),
        "Order status updated via API"
    );

    Ok(Json(order))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_status_request_uses_snake_case() {
        let req: SetStatusRequest = serde_json::from_str(r#"{"status": "processing"}"#).unwrap();
        assert_eq!(req.status, OrderStatus::Processing);

        assert!(serde_json::from_str::<SetStatusRequest>(r#"{"status": "Packed"}"#).is_err());
    }
}
