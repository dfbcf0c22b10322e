//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (verifies database)
//!
//! # Catalog
//! GET  /categories             - Category tree listing
//! GET  /categories/{slug}      - Category page (subtree products, filters)
//! GET  /products               - Product listing with filters and sorting
//! GET  /products/{slug}        - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update            - Update quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove line (returns cart_items fragment)
//! POST /cart/clear             - Empty the cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Favorites / Compare (HTMX fragments)
//! GET  /favorites              - Favorites page
//! POST /favorites/toggle       - Toggle favorite (returns count badge)
//! GET  /favorites/count        - Favorites count badge (fragment)
//! GET  /compare                - Comparison page
//! POST /compare/toggle         - Toggle compare entry (returns count badge)
//! POST /compare/remove         - Remove compare entry (returns table fragment)
//! GET  /compare/count          - Compare count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Checkout form
//! POST /checkout               - Place order
//! GET  /checkout/success       - Order confirmation
//!
//! # Quick orders and reviews (rate limited)
//! POST /quick-order            - Name + phone callback request
//! GET  /reviews                - Approved reviews + submission form
//! POST /reviews                - Submit review (pending moderation)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action (rate limited)
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action (rate limited)
//! POST /auth/logout            - Logout action
//!
//! # Account (requires auth)
//! GET  /account                - Order history + profile form
//! POST /account/profile        - Update profile
//! GET  /account/orders/{id}    - Order detail
//!
//! # JSON API (permissive CORS, rate limited)
//! GET  /api/categories         - Flat list + nested tree
//! GET  /api/products           - Filtered product list
//! GET  /api/filters            - Facets for filter UIs
//! GET  /api/locations          - Pickup points
//! GET  /api/reviews/approved   - Approved reviews
//! POST /api/quick-orders       - Create quick order (JSON body)
//! ```

pub mod account;
pub mod api;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod compare;
pub mod favorites;
pub mod home;
pub mod products;
pub mod quick_order;
pub mod reviews;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::middleware::{api_rate_limiter, auth_rate_limiter, form_rate_limiter};
use crate::models::CurrentUser;
use crate::state::AppState;

// =============================================================================
// Shared Page Context
// =============================================================================

/// A second-level category link in the navigation menu.
#[derive(Clone)]
pub struct NavChild {
    pub name: String,
    pub slug: String,
}

/// A top-level category with its dropdown entries.
#[derive(Clone)]
pub struct NavCategory {
    pub name: String,
    pub slug: String,
    pub children: Vec<NavChild>,
}

/// Data every full page template needs: the navigation menu and the
/// logged-in user's name for the header greeting.
#[derive(Clone)]
pub struct BaseContext {
    pub nav: Vec<NavCategory>,
    pub user_name: Option<String>,
}

impl BaseContext {
    /// Assemble the shared context for a page render.
    ///
    /// A category tree failure degrades to an empty menu rather than a
    /// broken page; the failure is logged.
    pub async fn load(state: &AppState, user: Option<&CurrentUser>) -> Self {
        let nav = match state.category_tree().await {
            Ok(tree) => tree
                .roots
                .iter()
                .map(|root| NavCategory {
                    name: root.category.name.clone(),
                    slug: root.category.slug.clone(),
                    children: root
                        .subcategories
                        .iter()
                        .map(|child| NavChild {
                            name: child.category.name.clone(),
                            slug: child.category.slug.clone(),
                        })
                        .collect(),
                })
                .collect(),
            Err(e) => {
                tracing::error!("Failed to load category tree for navigation: {e}");
                Vec::new()
            }
        };

        Self {
            nav,
            user_name: user.map(|u| u.name.clone()),
        }
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index))
        .route("/{slug}", get(categories::show))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the favorites routes router.
pub fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::show))
        .route("/toggle", post(favorites::toggle))
        .route("/count", get(favorites::count))
}

/// Create the comparison routes router.
pub fn compare_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(compare::show))
        .route("/toggle", post(compare::toggle))
        .route("/remove", post(compare::remove))
        .route("/count", get(compare::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::form).post(checkout::submit))
        .route("/success", get(checkout::success))
}

/// Create the reviews router. Submission shares the page path but carries
/// its own rate limit.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(reviews::index))
        .route("/", post(reviews::create).layer(form_rate_limiter()))
}

/// Create the auth routes router. Credential POSTs are rate limited per IP.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page))
        .route("/login", post(auth::login).layer(auth_rate_limiter()))
        .route("/register", get(auth::register_page))
        .route("/register", post(auth::register).layer(auth_rate_limiter()))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/profile", post(account::update_profile))
        .route("/orders/{id}", get(account::order_detail))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(api::categories::list))
        .route("/products", get(api::products::list))
        .route("/filters", get(api::filters::list))
        .route("/locations", get(api::locations::list))
        .route("/reviews/approved", get(api::reviews::approved))
        .route("/quick-orders", post(api::quick_orders::create))
        .layer(api_rate_limiter())
        .layer(CorsLayer::permissive())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .nest("/categories", category_routes())
        .nest("/products", product_routes())
        // Shopping collections
        .nest("/cart", cart_routes())
        .nest("/favorites", favorites_routes())
        .nest("/compare", compare_routes())
        // Checkout
        .nest("/checkout", checkout_routes())
        // Quick orders (rate limited)
        .route(
            "/quick-order",
            post(quick_order::create).layer(form_rate_limiter()),
        )
        // Reviews
        .nest("/reviews", review_routes())
        // Account routes
        .nest("/account", account_routes())
        // Auth routes
        .nest("/auth", auth_routes())
        // JSON API
        .nest("/api", api_routes())
}
