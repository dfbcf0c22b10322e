//! Dashboard route handler.
//!
//! One screen of counts so an admin opening the panel sees what needs
//! attention: new quick orders, pending reviews, and orders by status.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use paws_core::{OrderStatus, QuickOrderStatus, ReviewStatus};

use crate::db::{
    CategoryRepository, OrderRepository, ProductRepository, QuickOrderRepository, ReviewRepository,
};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::routes::AdminContext;

/// Order row on the dashboard's recent-orders list.
pub struct RecentOrderView {
    pub id: i32,
    pub customer_name: String,
    pub status_label: &'static str,
    pub status: &'static str,
    pub total: String,
    pub created_at: String,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: AdminContext,
    pub new_orders: i64,
    pub processing_orders: i64,
    pub new_quick_orders: i64,
    pub pending_reviews: i64,
    pub product_count: i64,
    pub category_count: i64,
    pub recent_orders: Vec<RecentOrderView>,
}

const RECENT_ORDERS: i64 = 8;

/// Display the dashboard.
#[instrument(skip(state, admin))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<crate::state::AppState>,
) -> Result<DashboardTemplate> {
    let orders = OrderRepository::new(state.pool());
    let quick_orders = QuickOrderRepository::new(state.pool());
    let reviews = ReviewRepository::new(state.pool());
    let products = ProductRepository::new(state.pool());
    let categories = CategoryRepository::new(state.pool());

    let (by_status, new_quick_orders, pending_reviews, product_count, category_count, recent) =
        tokio::try_join!(
            orders.count_by_status(),
            quick_orders.count(Some(QuickOrderStatus::New)),
            reviews.count_with_status(ReviewStatus::Pending),
            products.count_all(),
            categories.count_all(),
            orders.list(None, RECENT_ORDERS, 0),
        )?;

    let status_count = |status: OrderStatus| {
        by_status
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, n)| *n)
    };

    let recent_orders = recent
        .into_iter()
        .map(|order| RecentOrderView {
            id: order.id.as_i32(),
            customer_name: order.customer_name,
            status_label: order.status.label(),
            status: order.status.as_str(),
            total: order.total.to_string(),
            created_at: order.created_at.format("%b %e, %Y %H:%M").to_string(),
        })
        .collect();

    Ok(DashboardTemplate {
        ctx: AdminContext::from(&admin),
        new_orders: status_count(OrderStatus::New),
        processing_orders: status_count(OrderStatus::Processing),
        new_quick_orders,
        pending_reviews,
        product_count,
        category_count,
        recent_orders,
    })
}
