//! Home page route handler.
//!
//! Every section degrades independently: a failed query logs an error and
//! renders empty rather than taking down the whole page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::{ProductFilter, ProductRepository, ReviewRepository};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::BaseContext;
use crate::routes::products::ProductCardView;
use crate::routes::reviews::ReviewView;
use crate::state::AppState;

/// Number of products in the "new arrivals" strip.
const LATEST_PRODUCTS: i64 = 8;

/// Number of reviews featured under the fold.
const FEATURED_REVIEWS: usize = 3;

/// A top-level category tile on the home page.
#[derive(Clone)]
pub struct CategoryTileView {
    pub name: String,
    pub slug: String,
    pub subcategory_count: usize,
}

/// Query parameters for quick-order feedback after the redirect.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub quick_order: Option<String>,
    pub error: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub base: BaseContext,
    /// Top-level category tiles.
    pub categories: Vec<CategoryTileView>,
    /// Newest products in the catalog.
    pub latest_products: Vec<ProductCardView>,
    /// Most recent approved reviews.
    pub recent_reviews: Vec<ReviewView>,
    /// The quick-order form posted successfully.
    pub quick_order_sent: bool,
    pub error: Option<String>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<HomeQuery>,
) -> impl IntoResponse {
    let filter = ProductFilter {
        limit: LATEST_PRODUCTS,
        ..ProductFilter::default()
    };
    let product_repo = ProductRepository::new(state.pool());
    let review_repo = ReviewRepository::new(state.pool());

    // The three sections are independent, so fetch them concurrently.
    let (tree, products, reviews) = tokio::join!(
        state.category_tree(),
        product_repo.list(&filter),
        review_repo.list_approved(None),
    );

    let categories = tree.map_or_else(
        |e| {
            tracing::error!("Failed to load category tree for home page: {e}");
            Vec::new()
        },
        |tree| {
            tree.roots
                .iter()
                .map(|node| CategoryTileView {
                    name: node.category.name.clone(),
                    slug: node.category.slug.clone(),
                    subcategory_count: node.subcategories.len(),
                })
                .collect()
        },
    );

    let latest_products = products.map_or_else(
        |e| {
            tracing::error!("Failed to fetch latest products: {e}");
            Vec::new()
        },
        |products| products.iter().map(ProductCardView::from).collect(),
    );

    let recent_reviews = reviews.map_or_else(
        |e| {
            tracing::error!("Failed to fetch recent reviews: {e}");
            Vec::new()
        },
        |reviews| {
            reviews
                .iter()
                .take(FEATURED_REVIEWS)
                .map(ReviewView::from)
                .collect()
        },
    );

    HomeTemplate {
        base: BaseContext::load(&state, user.as_ref()).await,
        categories,
        latest_products,
        recent_reviews,
        quick_order_sent: query.quick_order.as_deref() == Some("sent"),
        error: query
            .error
            .as_deref()
            .filter(|code| *code == "quick_order")
            .map(|_| "Please fill in your name and phone number.".to_owned()),
    }
}
