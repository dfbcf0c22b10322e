//! Quick order API route.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use paws_core::ProductId;

use crate::db::{ProductRepository, QuickOrderRepository};
use crate::routes::api::ApiError;
use crate::state::AppState;

/// Request body for creating a quick order.
#[derive(Debug, Deserialize)]
pub struct CreateQuickOrderRequest {
    pub customer_name: String,
    pub phone: String,
    /// Product the callback is about, if any.
    pub product_id: Option<i32>,
}

/// Field-level validation errors, keyed by field name.
#[derive(Debug, Serialize)]
pub struct ValidationErrors {
    pub errors: serde_json::Value,
}

/// Create a quick order from a JSON body.
///
/// POST /api/quick-orders
///
/// Returns 201 with the created record, or 422 with per-field errors.
///
/// # Errors
///
/// Returns `ApiError` if persisting fails.
#[instrument(skip(state, req))]
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateQuickOrderRequest>,
) -> Result<Response, ApiError> {
    let customer_name = req.customer_name.trim();
    let phone = req.phone.trim();

    let mut errors = serde_json::Map::new();
    if customer_name.is_empty() {
        errors.insert(
            "customer_name".to_owned(),
            serde_json::Value::String("is required".to_owned()),
        );
    }
    if phone.is_empty() {
        errors.insert(
            "phone".to_owned(),
            serde_json::Value::String("is required".to_owned()),
        );
    }
    if !errors.is_empty() {
        return Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationErrors {
                errors: serde_json::Value::Object(errors),
            }),
        )
            .into_response());
    }

    // The product reference is best effort; an unknown id is stored as None.
    let product = match req.product_id {
        Some(raw) => {
            ProductRepository::new(state.pool())
                .get_by_id(ProductId::new(raw))
                .await?
        }
        None => None,
    };

    let quick_order = QuickOrderRepository::new(state.pool())
        .create(
            customer_name,
            phone,
            product.as_ref().map(|p| p.id),
            product.as_ref().map(|p| p.name.as_str()),
        )
        .await?;

    tracing::info!(
        quick_order_id = quick_order.id.as_i32(),
        "Quick order created via API"
    );

    Ok((StatusCode::CREATED, Json(quick_order)).into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_deserializes_without_product() {
        let req: CreateQuickOrderRequest =
            serde_json::from_str(r#"{"customer_name": "Anna", "phone": "+1 555 0100"}"#).unwrap();
        assert_eq!(req.customer_name, "Anna");
        assert_eq!(req.product_id, None);
    }
}
