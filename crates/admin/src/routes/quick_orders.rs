//! Quick-order (callback request) management routes.
//!
//! Quick orders carry only a name, a phone number, and possibly a product.
//! Operators work the list top to bottom: call, then mark contacted, then
//! done or cancelled.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use paws_core::{QuickOrderId, QuickOrderStatus};

use crate::db::{QuickOrderRepository, RepositoryError};
use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAdminAuth, RequireEditor};
use crate::routes::AdminContext;
use crate::routes::orders::StatusOptionView;
use crate::state::AppState;

const PAGE_SIZE: i64 = 25;

fn status_options() -> Vec<StatusOptionView> {
    QuickOrderStatus::ALL
        .iter()
        .map(|status| StatusOptionView {
            value: status.as_str(),
            label: status.label(),
        })
        .collect()
}

/// One row in the quick-order table.
pub struct QuickOrderRowView {
    pub id: i32,
    pub customer_name: String,
    pub phone: String,
    pub product_name: Option<String>,
    pub status: &'static str,
    pub status_label: &'static str,
    pub created_at: String,
}

/// Quick-order listing template.
#[derive(Template, WebTemplate)]
#[template(path = "quick_orders/index.html")]
pub struct QuickOrdersTemplate {
    pub ctx: AdminContext,
    pub quick_orders: Vec<QuickOrderRowView>,
    pub statuses: Vec<StatusOptionView>,
    pub status: String,
    pub page: i64,
    pub total_pages: i64,
    pub total: i64,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Query parameters for the listing: filters plus redirect messages.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Status form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

fn notice_message(code: &str) -> String {
    match code {
        "saved" => "Quick order updated.".to_owned(),
        _ => "Done.".to_owned(),
    }
}

fn error_message(code: &str) -> String {
    match code {
        "status" => "That status is not recognized.".to_owned(),
        "missing" => "That quick order no longer exists.".to_owned(),
        _ => "Something went wrong. Please try again.".to_owned(),
    }
}

/// Display the quick-order list.
#[instrument(skip(state, admin))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<QuickOrdersTemplate> {
    let status = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<QuickOrderStatus>().ok());
    let page = query.page.unwrap_or(1).max(1);

    let repo = QuickOrderRepository::new(state.pool());
    let (rows, total) = tokio::try_join!(
        repo.list(status, PAGE_SIZE, (page - 1) * PAGE_SIZE),
        repo.count(status),
    )?;

    let total_pages = ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
    let page_url = |p: i64| match status {
        Some(s) => format!("/quick-orders?page={p}&status={}", s.as_str()),
        None => format!("/quick-orders?page={p}"),
    };

    Ok(QuickOrdersTemplate {
        ctx: AdminContext::from(&admin),
        quick_orders: rows
            .into_iter()
            .map(|quick_order| QuickOrderRowView {
                id: quick_order.id.as_i32(),
                customer_name: quick_order.customer_name,
                phone: quick_order.phone,
                product_name: quick_order.product_name,
                status: quick_order.status.as_str(),
                status_label: quick_order.status.label(),
                created_at: quick_order.created_at.format("%b %e, %Y %H:%M").to_string(),
            })
            .collect(),
        statuses: status_options(),
        status: status.map(|s| s.as_str().to_owned()).unwrap_or_default(),
        page,
        total_pages,
        total,
        prev_url: (page > 1).then(|| page_url(page - 1)),
        next_url: (page < total_pages).then(|| page_url(page + 1)),
        notice: query.notice.as_deref().map(notice_message),
        error: query.error.as_deref().map(error_message),
    })
}

/// Handle the per-row status form.
#[instrument(skip(state, admin, form))]
pub async fn set_status(
    RequireEditor(admin): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    let Ok(status) = form.status.parse::<QuickOrderStatus>() else {
        return Ok(Redirect::to("/quick-orders?error=status").into_response());
    };

    match QuickOrderRepository::new(state.pool())
        .update_status(QuickOrderId::new(id), status)
        .await
    {
        Ok(quick_order) => {
            tracing::info!(
                admin_id = admin.id.as_i32(),
                quick_order_id = quick_order.id.as_i32(),
                status = status.as_str(),
                "Quick order status updated"
            );
            Ok(Redirect::to("/quick-orders?notice=saved").into_response())
        }
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/quick-orders?error=missing").into_response())
        }
        Err(e) => Err(e.into()),
    }
}
