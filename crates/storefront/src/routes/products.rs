//! Product route handlers.
//!
//! The listing page and the category page share [`CatalogQuery`]: every
//! filter arrives as an optional string and malformed values are dropped
//! rather than turned into errors, so a mangled URL still renders a page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use paws_core::collection::CollectionKind;
use paws_core::models::{Product, ProductVariant};
use paws_core::{CategoryId, ProductId};

use crate::collections::load_collection;
use crate::db::{ProductFacets, ProductFilter, ProductRepository, ProductSort, ReviewRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::BaseContext;
use crate::routes::reviews::ReviewView;
use crate::state::AppState;

/// Products per listing page.
pub const PER_PAGE: i64 = 12;

/// Number of listing pages needed for `total` products, at least one.
pub fn page_count(total: i64) -> i64 {
    ((total + PER_PAGE - 1) / PER_PAGE).max(1)
}

// =============================================================================
// View Types
// =============================================================================

/// Product display data for grid cards.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    pub price: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            image: product.image.clone(),
            price: product.price.to_string(),
            in_stock: product.in_stock,
        }
    }
}

/// Product display data for the detail page.
#[derive(Clone)]
pub struct ProductDetailView {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: Option<String>,
    pub price: String,
    pub in_stock: bool,
}

impl From<&Product> for ProductDetailView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            image: product.image.clone(),
            price: product.price.to_string(),
            in_stock: product.in_stock,
        }
    }
}

/// Weight variant display data.
#[derive(Clone)]
pub struct VariantView {
    /// Normalized weight, doubles as the form value (e.g. `2` or `0.5`).
    pub weight: String,
    pub price: String,
}

impl From<&ProductVariant> for VariantView {
    fn from(variant: &ProductVariant) -> Self {
        Self {
            weight: variant.weight.normalize().to_string(),
            price: variant.price.to_string(),
        }
    }
}

/// Breadcrumb link.
#[derive(Clone)]
pub struct BreadcrumbView {
    pub name: String,
    pub slug: String,
}

/// Filter sidebar bounds, preformatted for display.
#[derive(Clone, Default)]
pub struct FacetsView {
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub weights: Vec<String>,
}

impl From<&ProductFacets> for FacetsView {
    fn from(facets: &ProductFacets) -> Self {
        Self {
            min_price: facets.min_price.map(|p| p.amount().normalize().to_string()),
            max_price: facets.max_price.map(|p| p.amount().normalize().to_string()),
            weights: facets
                .weights
                .iter()
                .map(|w| w.normalize().to_string())
                .collect(),
        }
    }
}

/// Category option for the listing filter dropdown, indented by level.
#[derive(Clone)]
pub struct CategoryOptionView {
    pub name: String,
    pub slug: String,
    pub level: usize,
}

// =============================================================================
// Query Parsing
// =============================================================================

/// Catalog filter parameters as they arrive on the query string.
///
/// Everything is optional and a string; numeric fields that fail to parse
/// are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub weight: Option<String>,
    pub in_stock: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl CatalogQuery {
    /// Requested page, 1-based. Malformed or out-of-range values mean page 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    /// Build the repository filter for this query.
    #[must_use]
    pub fn filter(&self, category_ids: Vec<CategoryId>) -> ProductFilter {
        ProductFilter {
            category_ids,
            min_price: parse_decimal(self.min_price.as_deref()),
            max_price: parse_decimal(self.max_price.as_deref()),
            weight: parse_decimal(self.weight.as_deref()),
            in_stock_only: self.in_stock_checked(),
            sort: ProductSort::parse(self.sort.as_deref()),
            limit: PER_PAGE,
            offset: (self.page() - 1) * PER_PAGE,
        }
    }

    /// Whether this sort value is the active one, for `selected` markers.
    #[must_use]
    pub fn is_sort(&self, value: &str) -> bool {
        ProductSort::parse(self.sort.as_deref()) == ProductSort::parse(Some(value))
    }

    /// Whether this category slug is the active filter.
    #[must_use]
    pub fn is_category(&self, slug: &str) -> bool {
        self.category.as_deref() == Some(slug)
    }

    /// Whether this weight option is the active filter.
    #[must_use]
    pub fn is_weight(&self, weight: &str) -> bool {
        self.weight.as_deref() == Some(weight)
    }

    /// Whether the in-stock checkbox should render checked.
    #[must_use]
    pub fn in_stock_checked(&self) -> bool {
        matches!(self.in_stock.as_deref(), Some("1" | "true" | "on"))
    }

    /// Query-string tail for pagination links, `page` excluded.
    #[must_use]
    pub fn retained_query(&self) -> String {
        let mut out = String::new();
        let pairs = [
            ("category", &self.category),
            ("min_price", &self.min_price),
            ("max_price", &self.max_price),
            ("weight", &self.weight),
            ("in_stock", &self.in_stock),
            ("sort", &self.sort),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                out.push('&');
                out.push_str(key);
                out.push('=');
                out.push_str(&urlencoding::encode(value));
            }
        }
        out
    }
}

fn parse_decimal(raw: Option<&str>) -> Option<Decimal> {
    raw.and_then(|v| v.trim().parse::<Decimal>().ok())
}

// =============================================================================
// Templates
// =============================================================================

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub base: BaseContext,
    pub products: Vec<ProductCardView>,
    pub facets: FacetsView,
    pub categories: Vec<CategoryOptionView>,
    pub query: CatalogQuery,
    pub total: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub retained_query: String,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub base: BaseContext,
    pub product: ProductDetailView,
    pub variants: Vec<VariantView>,
    pub breadcrumbs: Vec<BreadcrumbView>,
    pub reviews: Vec<ReviewView>,
    pub is_favorite: bool,
    pub quick_order_sent: bool,
    pub review_sent: bool,
    pub error: Option<String>,
}

/// Query parameters for post-redirect notices on the detail page.
#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    pub quick_order: Option<String>,
    pub review: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the product listing with filters, sorting, and pagination.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse> {
    let tree = state.category_tree().await?;

    // An unknown category slug in the filter is dropped like any other
    // malformed value.
    let category_ids = query
        .category
        .as_deref()
        .and_then(|slug| tree.find_by_slug(slug))
        .map(|node| tree.subtree_ids(node.category.id))
        .unwrap_or_default();

    let repo = ProductRepository::new(state.pool());
    let filter = query.filter(category_ids);
    let products = repo.list(&filter).await?;
    let total = repo.count(&filter).await?;
    let facets = repo.facets().await?;

    let categories = tree
        .flatten()
        .into_iter()
        .map(|flat| CategoryOptionView {
            name: flat.name,
            slug: flat.slug,
            level: flat.level,
        })
        .collect();

    Ok(ProductsIndexTemplate {
        base: BaseContext::load(&state, user.as_ref()).await,
        products: products.iter().map(ProductCardView::from).collect(),
        facets: FacetsView::from(&facets),
        categories,
        total,
        current_page: query.page(),
        total_pages: page_count(total),
        retained_query: query.retained_query(),
        query,
    })
}

/// Display the product detail page.
#[instrument(skip(state, user, session))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Path(slug): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Result<impl IntoResponse> {
    let repo = ProductRepository::new(state.pool());
    let product = repo
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let variants = repo.variants_for(product.id).await?;
    let reviews = ReviewRepository::new(state.pool())
        .list_approved(Some(product.id))
        .await?;

    let tree = state.category_tree().await?;
    let breadcrumbs = tree
        .path_to(product.category_id)
        .into_iter()
        .map(|category| BreadcrumbView {
            name: category.name.clone(),
            slug: category.slug.clone(),
        })
        .collect();

    let favorites = load_collection(&session, CollectionKind::Favorites).await;
    let is_favorite = favorites.contains(product.id, None);

    Ok(ProductShowTemplate {
        base: BaseContext::load(&state, user.as_ref()).await,
        product: ProductDetailView::from(&product),
        variants: variants.iter().map(VariantView::from).collect(),
        breadcrumbs,
        reviews: reviews.iter().map(ReviewView::from).collect(),
        is_favorite,
        quick_order_sent: query.quick_order.as_deref() == Some("sent"),
        review_sent: query.review.as_deref() == Some("sent"),
        error: query.error.as_deref().map(error_message),
    })
}

/// Translate an error code from a redirect into a customer-facing message.
fn error_message(code: &str) -> String {
    match code {
        "quick_order" => "Please fill in your name and phone number.".to_owned(),
        "review" => "Please fill in your name and review text.".to_owned(),
        _ => "Something went wrong. Please try again.".to_owned(),
    }
}

/// Look up a product and the price for an optionally requested weight
/// variant, for building collection snapshots server-side.
///
/// Returns `None` when the product does not exist or the requested weight
/// has no variant. Submitted prices are never trusted; the snapshot price
/// always comes from the catalog.
pub(super) async fn snapshot_for(
    state: &AppState,
    product_id: ProductId,
    weight: Option<Decimal>,
) -> Result<Option<paws_core::collection::ItemSnapshot>> {
    let repo = ProductRepository::new(state.pool());
    let Some(product) = repo.get_by_id(product_id).await? else {
        return Ok(None);
    };

    let price = match weight {
        Some(weight) => match repo.get_variant(product_id, weight).await? {
            Some(variant) => variant.price,
            None => return Ok(None),
        },
        None => product.price,
    };

    Ok(Some(paws_core::collection::ItemSnapshot {
        product_id: product.id,
        name: product.name,
        price,
        image: product.image,
        weight,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_query_page_defaults() {
        let query = CatalogQuery::default();
        assert_eq!(query.page(), 1);

        let query = CatalogQuery {
            page: Some("3".to_owned()),
            ..CatalogQuery::default()
        };
        assert_eq!(query.page(), 3);

        // Malformed and out-of-range pages fall back to 1
        for bad in ["zero", "-2", "0", ""] {
            let query = CatalogQuery {
                page: Some(bad.to_owned()),
                ..CatalogQuery::default()
            };
            assert_eq!(query.page(), 1, "page={bad:?}");
        }
    }

    #[test]
    fn test_catalog_query_drops_malformed_numbers() {
        let query = CatalogQuery {
            min_price: Some("ten".to_owned()),
            max_price: Some("50".to_owned()),
            weight: Some(String::new()),
            ..CatalogQuery::default()
        };
        let filter = query.filter(Vec::new());

        assert_eq!(filter.min_price, None);
        assert_eq!(filter.max_price, Some(Decimal::from(50)));
        assert_eq!(filter.weight, None);
    }

    #[test]
    fn test_catalog_query_in_stock_flag() {
        for on in ["1", "true", "on"] {
            let query = CatalogQuery {
                in_stock: Some(on.to_owned()),
                ..CatalogQuery::default()
            };
            assert!(query.filter(Vec::new()).in_stock_only, "in_stock={on:?}");
        }

        let query = CatalogQuery {
            in_stock: Some("no".to_owned()),
            ..CatalogQuery::default()
        };
        assert!(!query.filter(Vec::new()).in_stock_only);
    }

    #[test]
    fn test_retained_query_skips_page_and_encodes() {
        let query = CatalogQuery {
            category: Some("dog food".to_owned()),
            sort: Some("price_asc".to_owned()),
            page: Some("4".to_owned()),
            ..CatalogQuery::default()
        };

        let retained = query.retained_query();
        assert_eq!(retained, "&category=dog%20food&sort=price_asc");
    }

    #[test]
    fn test_pagination_offset() {
        let query = CatalogQuery {
            page: Some("3".to_owned()),
            ..CatalogQuery::default()
        };
        let filter = query.filter(Vec::new());
        assert_eq!(filter.offset, 2 * PER_PAGE);
        assert_eq!(filter.limit, PER_PAGE);
    }

    #[test]
    fn test_page_count_rounds_up_and_never_hits_zero() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(PER_PAGE), 1);
        assert_eq!(page_count(PER_PAGE + 1), 2);
        assert_eq!(page_count(5 * PER_PAGE), 5);
    }
}
