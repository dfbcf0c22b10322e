//! Order management routes.
//!
//! Listing with a status filter, a detail page with the line items, and a
//! status form that accepts any assignment so mistakes can be walked back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use paws_core::models::OrderItem;
use paws_core::{OrderId, OrderStatus};

use crate::db::{OrderRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireAdminAuth, RequireEditor};
use crate::routes::AdminContext;
use crate::state::AppState;

const PAGE_SIZE: i64 = 25;

/// One option of a status select or filter.
pub struct StatusOptionView {
    pub value: &'static str,
    pub label: &'static str,
}

/// Every order status, for select menus.
fn status_options() -> Vec<StatusOptionView> {
    OrderStatus::ALL
        .iter()
        .map(|status| StatusOptionView {
            value: status.as_str(),
            label: status.label(),
        })
        .collect()
}

/// One row in the order table.
pub struct OrderRowView {
    pub id: i32,
    pub customer_name: String,
    pub email: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub total: String,
    pub created_at: String,
}

/// One line item on the detail page.
pub struct OrderItemView {
    pub product_name: String,
    pub weight: Option<String>,
    pub unit_price: String,
    pub quantity: i32,
    pub line_total: String,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_name: item.product_name.clone(),
            weight: item.weight.map(|w| format!("{w} kg")),
            unit_price: item.unit_price.to_string(),
            quantity: item.quantity,
            line_total: item.line_total().to_string(),
        }
    }
}

/// Order listing template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub ctx: AdminContext,
    pub orders: Vec<OrderRowView>,
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

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderDetailTemplate {
    pub ctx: AdminContext,
    pub id: i32,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    /// Street address or pickup point, already worded for display.
    pub delivery: String,
    pub comment: Option<String>,
    pub status: &'static str,
    pub status_label: &'static str,
    pub statuses: Vec<StatusOptionView>,
    pub items: Vec<OrderItemView>,
    pub total: String,
    pub created_at: String,
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

/// Query parameters carried through the POST-redirect-GET cycle.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
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
        "saved" => "Order status updated.".to_owned(),
        _ => "Done.".to_owned(),
    }
}

fn error_message(code: &str) -> String {
    match code {
        "status" => "That status is not recognized.".to_owned(),
        "missing" => "That order no longer exists.".to_owned(),
        _ => "Something went wrong. Please try again.".to_owned(),
    }
}

/// Display the order list.
#[instrument(skip(state, admin))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<OrdersTemplate> {
    let status = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<OrderStatus>().ok());
    let page = query.page.unwrap_or(1).max(1);

    let repo = OrderRepository::new(state.pool());
    let (rows, total) = tokio::try_join!(
        repo.list(status, PAGE_SIZE, (page - 1) * PAGE_SIZE),
        repo.count(status),
    )?;

    let total_pages = ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
    let page_url = |p: i64| match status {
        Some(s) => format!("/orders?page={p}&status={}", s.as_str()),
        None => format!("/orders?page={p}"),
    };

    Ok(OrdersTemplate {
        ctx: AdminContext::from(&admin),
        orders: rows
            .into_iter()
            .map(|order| OrderRowView {
                id: order.id.as_i32(),
                customer_name: order.customer_name,
                email: order.email.to_string(),
                status: order.status.as_str(),
                status_label: order.status.label(),
                total: order.total.to_string(),
                created_at: order.created_at.format("%b %e, %Y %H:%M").to_string(),
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

/// Display one order with its items.
#[instrument(skip(state, admin))]
pub async fn show(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<MessageQuery>,
) -> Result<OrderDetailTemplate> {
    let repo = OrderRepository::new(state.pool());
    let (order, items) = repo
        .get_with_items(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let delivery = if let Some(pickup_point_id) = order.pickup_point_id {
        let label = repo.pickup_point_label(pickup_point_id).await?;
        format!(
            "Pickup: {}",
            label.unwrap_or_else(|| format!("point #{}", pickup_point_id.as_i32()))
        )
    } else {
        order
            .address
            .clone()
            .map_or_else(|| "Not specified".to_owned(), |a| format!("Delivery: {a}"))
    };

    Ok(OrderDetailTemplate {
        ctx: AdminContext::from(&admin),
        id: order.id.as_i32(),
        customer_name: order.customer_name,
        email: order.email.to_string(),
        phone: order.phone,
        delivery,
        comment: order.comment,
        status: order.status.as_str(),
        status_label: order.status.label(),
        statuses: status_options(),
        items: items.iter().map(OrderItemView::from).collect(),
        total: order.total.to_string(),
        created_at: order.created_at.format("%b %e, %Y %H:%M").to_string(),
        notice: query.notice.as_deref().map(notice_message),
        error: query.error.as_deref().map(error_message),
    })
}

/// Handle the status form on the detail page.
#[instrument(skip(state, admin, form))]
pub async fn set_status(
    RequireEditor(admin): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    let Ok(status) = form.status.parse::<OrderStatus>() else {
        return Ok(Redirect::to(&format!("/orders/{id}?error=status")).into_response());
    };

    match OrderRepository::new(state.pool())
        .update_status(OrderId::new(id), status)
        .await
    {
        Ok(order) => {
            tracing::info!(
                admin_id = admin.id.as_i32(),
                order_id = order.id.as_i32(),
                status = status.as_str(),
                "Order status updated"
            );
            Ok(Redirect::to(&format!("/orders/{id}?notice=saved")).into_response())
        }
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/orders?error=missing").into_response())
        }
        Err(e) => Err(e.into()),
    }
}
