//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::BaseContext;
use crate::routes::products::{
    BreadcrumbView, CatalogQuery, FacetsView, ProductCardView, page_count,
};
use crate::state::AppState;

/// One row of the category listing, indented by depth.
#[derive(Clone)]
pub struct CategoryRowView {
    pub name: String,
    pub slug: String,
    pub level: usize,
}

/// Subcategory tile on a category page.
#[derive(Clone)]
pub struct SubcategoryView {
    pub name: String,
    pub slug: String,
}

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub base: BaseContext,
    pub categories: Vec<CategoryRowView>,
}

/// Category page template: subtree products with filters and pagination.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub base: BaseContext,
    pub name: String,
    pub slug: String,
    pub breadcrumbs: Vec<BreadcrumbView>,
    pub subcategories: Vec<SubcategoryView>,
    pub products: Vec<ProductCardView>,
    pub facets: FacetsView,
    pub query: CatalogQuery,
    pub total: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub retained_query: String,
}

/// Display the full category tree as an indented listing.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<impl IntoResponse> {
    let tree = state.category_tree().await?;

    let categories = tree
        .flatten()
        .into_iter()
        .map(|flat| CategoryRowView {
            name: flat.name,
            slug: flat.slug,
            level: flat.level,
        })
        .collect();

    Ok(CategoriesIndexTemplate {
        base: BaseContext::load(&state, user.as_ref()).await,
        categories,
    })
}

/// Display one category: its subcategories plus every product in its
/// subtree, filtered and paginated.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(slug): Path<String>,
    Query(query): Query<CatalogQuery>,
) -> Result<impl IntoResponse> {
    let tree = state.category_tree().await?;
    let node = tree
        .find_by_slug(&slug)
        .ok_or_else(|| AppError::NotFound(format!("category {slug}")))?;

    let breadcrumbs = tree
        .path_to(node.category.id)
        .into_iter()
        .map(|category| BreadcrumbView {
            name: category.name.clone(),
            slug: category.slug.clone(),
        })
        .collect();

    let subcategories = node
        .subcategories
        .iter()
        .map(|child| SubcategoryView {
            name: child.category.name.clone(),
            slug: child.category.slug.clone(),
        })
        .collect();

    let repo = ProductRepository::new(state.pool());
    let filter = query.filter(tree.subtree_ids(node.category.id));
    let products = repo.list(&filter).await?;
    let total = repo.count(&filter).await?;
    let facets = repo.facets().await?;

    Ok(CategoryShowTemplate {
        base: BaseContext::load(&state, user.as_ref()).await,
        name: node.category.name.clone(),
        slug: node.category.slug.clone(),
        breadcrumbs,
        subcategories,
        products: products.iter().map(ProductCardView::from).collect(),
        facets: FacetsView::from(&facets),
        total,
        current_page: query.page(),
        total_pages: page_count(total),
        retained_query: query.retained_query(),
        query,
    })
}
