//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Dashboard (counts + recent activity)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! POST /auth/logout            - Logout action
//!
//! # Categories
//! GET  /categories             - Tree view + create form
//! POST /categories             - Create category
//! POST /categories/{id}/delete - Delete (children climb to the parent)
//!
//! # Products
//! GET  /products               - List with category/search filters
//! GET  /products/new           - Create form
//! POST /products               - Create product
//! GET  /products/{id}/edit     - Edit form (variants inline)
//! POST /products/{id}          - Update product
//! POST /products/{id}/delete   - Delete product
//!
//! # Orders
//! GET  /orders                 - List, filterable by status
//! GET  /orders/{id}            - Detail with status form
//! POST /orders/{id}/status     - Assign status (form path)
//!
//! # Quick orders
//! GET  /quick-orders           - List, filterable by status
//! POST /quick-orders/{id}/status - Assign status (form path)
//!
//! # Reviews
//! GET  /reviews                - Moderation queue, filterable by status
//! POST /reviews/{id}/approve   - Approve
//! POST /reviews/{id}/reject    - Reject
//! POST /reviews/{id}/delete    - Delete outright
//!
//! # Admin users (super admin only)
//! GET  /admins                 - List + create form
//! POST /admins                 - Create admin account
//! POST /admins/{id}/toggle     - Activate/deactivate account
//!
//! # JSON API
//! PATCH /api/orders/{id}       - Assign order status
//! PATCH /api/quick-orders/{id} - Assign quick-order status
//! ```
//!
//! Pages require a logged-in admin; mutating handlers additionally require
//! an editing role. Writes use POST-redirect-GET with `?notice=`/`?error=`
//! codes so refreshes never repeat an action.

pub mod admin_users;
pub mod api;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod quick_orders;
pub mod reviews;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::models::CurrentAdmin;
use crate::state::AppState;

// =============================================================================
// Shared Page Context
// =============================================================================

/// Data every admin page template needs: who is logged in and which
/// parts of the panel their role unlocks.
#[derive(Clone)]
pub struct AdminContext {
    pub name: String,
    pub role_label: &'static str,
    pub can_edit: bool,
    pub is_super_admin: bool,
}

impl From<&CurrentAdmin> for AdminContext {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            role_label: admin.role.label(),
            can_edit: admin.can_edit(),
            is_super_admin: admin.is_super_admin(),
        }
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route("/{id}/delete", post(categories::delete))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new_form))
        .route("/{id}", post(products::update))
        .route("/{id}/edit", get(products::edit_form))
        .route("/{id}/delete", post(products::delete))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
        .route("/{id}/status", post(orders::set_status))
}

/// Create the quick-order routes router.
pub fn quick_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(quick_orders::index))
        .route("/{id}/status", post(quick_orders::set_status))
}

/// Create the review moderation router.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::index))
        .route("/{id}/approve", post(reviews::approve))
        .route("/{id}/reject", post(reviews::reject))
        .route("/{id}/delete", post(reviews::delete))
}

/// Create the admin-users router (super admin only, enforced per handler).
pub fn admin_user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_users::index).post(admin_users::create))
        .route("/{id}/toggle", post(admin_users::toggle_active))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/orders/{id}", patch(api::orders::set_status))
        .route("/quick-orders/{id}", patch(api::quick_orders::set_status))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .nest("/auth", auth_routes())
        .nest("/categories", category_routes())
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .nest("/quick-orders", quick_order_routes())
        .nest("/reviews", review_routes())
        .nest("/admins", admin_user_routes())
        .nest("/api", api_routes())
}

/// Slugs become URL path segments on the storefront, so only lowercase
/// ASCII letters, digits, and hyphens are accepted.
pub(crate) fn valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slug() {
        assert!(valid_slug("dog-food"));
        assert!(valid_slug("toys2"));
        assert!(!valid_slug(""));
        assert!(!valid_slug("Dog Food"));
        assert!(!valid_slug("chats/jouets"));
    }
}
