//! Quick order route handler.
//!
//! A quick order is a callback request: name and phone, optionally tied to
//! the product whose page the form sat on. An operator phones the customer
//! back to arrange the rest.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use paws_core::ProductId;

use crate::db::{ProductRepository, QuickOrderRepository};
use crate::error::Result;
use crate::state::AppState;

/// Quick order form data.
#[derive(Debug, Deserialize)]
pub struct QuickOrderForm {
    pub customer_name: String,
    pub phone: String,
    pub product_id: Option<i32>,
    /// Slug of the page the form was on, for the redirect back.
    pub product_slug: Option<String>,
}

/// Create a quick order and bounce back to the originating page.
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<QuickOrderForm>,
) -> Result<Response> {
    let back = form
        .product_slug
        .as_deref()
        .map_or_else(|| "/".to_owned(), |slug| format!("/products/{slug}"));

    if form.customer_name.trim().is_empty() || form.phone.trim().is_empty() {
        return Ok(Redirect::to(&format!("{back}?error=quick_order")).into_response());
    }

    // The product reference is best effort: a deleted product still gets
    // the customer a callback.
    let product = match form.product_id {
        Some(raw) => {
            ProductRepository::new(state.pool())
                .get_by_id(ProductId::new(raw))
                .await?
        }
        None => None,
    };

    let quick_order = QuickOrderRepository::new(state.pool())
        .create(
            form.customer_name.trim(),
            form.phone.trim(),
            product.as_ref().map(|p| p.id),
            product.as_ref().map(|p| p.name.as_str()),
        )
        .await?;
    tracing::info!(quick_order_id = quick_order.id.as_i32(), "Quick order created");

    Ok(Redirect::to(&format!("{back}?quick_order=sent")).into_response())
}
