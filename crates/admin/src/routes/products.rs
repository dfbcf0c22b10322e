//! Product management routes.
//!
//! List with search and category filter, a shared create/edit form, and
//! inline variant editing. Variants are typed one per line as
//! `weight price` (kilograms, then the price for that package) and replace
//! the product's variant list wholesale on save.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use paws_core::catalog::CategoryTree;
use paws_core::models::{Category, ProductVariant};
use paws_core::{CategoryId, Price, ProductId};

use crate::db::{
    CategoryRepository, NewProduct, ProductListFilter, ProductRepository, RepositoryError,
};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireAdminAuth, RequireEditor};
use crate::routes::{AdminContext, valid_slug};
use crate::state::AppState;

const PAGE_SIZE: i64 = 25;

/// One row in the product table.
pub struct ProductRowView {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub price: String,
    pub in_stock: bool,
    pub created_at: String,
}

/// Category option for select menus, indented by tree depth.
pub struct CategoryOptionView {
    pub id: i32,
    pub label: String,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub ctx: AdminContext,
    pub products: Vec<ProductRowView>,
    pub categories: Vec<CategoryOptionView>,
    pub q: String,
    pub category_id: i32,
    pub page: i64,
    pub total_pages: i64,
    pub total: i64,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Shared create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub ctx: AdminContext,
    pub heading: String,
    pub action: String,
    pub delete_action: Option<String>,
    pub categories: Vec<CategoryOptionView>,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: String,
    pub price: String,
    pub in_stock: bool,
    pub category_id: i32,
    pub variants_text: String,
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Query parameters for the listing: filters plus redirect messages.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub category: Option<i32>,
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

/// Create/edit form data.
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: Option<String>,
    pub price: String,
    pub in_stock: Option<String>,
    pub category_id: String,
    pub variants: Option<String>,
}

fn notice_message(code: &str) -> String {
    match code {
        "created" => "Product created.".to_owned(),
        "saved" => "Product saved.".to_owned(),
        "deleted" => "Product deleted.".to_owned(),
        _ => "Done.".to_owned(),
    }
}

fn error_message(code: &str) -> String {
    match code {
        "invalid" => "Enter a name, a slug (lowercase letters, digits, hyphens), and a category."
            .to_owned(),
        "price" => "The price could not be read. Use a plain number like 14.90.".to_owned(),
        "variants" => {
            "Variants could not be read. One per line: weight in kg, then price, \
             for example \"2.5 14.90\"."
                .to_owned()
        }
        "slug_taken" => "That slug is already in use.".to_owned(),
        "missing" => "That product no longer exists.".to_owned(),
        _ => "Something went wrong. Please try again.".to_owned(),
    }
}

/// Display the product list.
#[instrument(skip(state, admin))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<ProductsTemplate> {
    let page = query.page.unwrap_or(1).max(1);
    let q = query.q.as_deref().unwrap_or("").trim().to_owned();
    let filter = ProductListFilter {
        category_id: query.category.filter(|id| *id > 0).map(CategoryId::new),
        search: (!q.is_empty()).then(|| q.clone()),
        limit: PAGE_SIZE,
        offset: (page - 1) * PAGE_SIZE,
    };

    let products = ProductRepository::new(state.pool());
    let categories = CategoryRepository::new(state.pool());
    let (rows, total, category_rows) = tokio::try_join!(
        products.list(&filter),
        products.count(&filter),
        categories.list_all(),
    )?;

    let names: std::collections::HashMap<CategoryId, String> = category_rows
        .iter()
        .map(|c| (c.id, c.name.clone()))
        .collect();

    let total_pages = ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
    let page_url = |p: i64| {
        let mut url = format!("/products?page={p}");
        if !q.is_empty() {
            url.push_str(&format!("&q={}", urlencoding::encode(&q)));
        }
        if let Some(category) = query.category.filter(|id| *id > 0) {
            url.push_str(&format!("&category={category}"));
        }
        url
    };

    Ok(ProductsTemplate {
        ctx: AdminContext::from(&admin),
        products: rows
            .into_iter()
            .map(|p| ProductRowView {
                id: p.id.as_i32(),
                name: p.name,
                slug: p.slug,
                category: names.get(&p.category_id).cloned().unwrap_or_default(),
                price: p.price.to_string(),
                in_stock: p.in_stock,
                created_at: p.created_at.format("%b %e, %Y").to_string(),
            })
            .collect(),
        categories: category_options(category_rows),
        q: q.clone(),
        category_id: query.category.unwrap_or(0),
        page,
        total_pages,
        total,
        prev_url: (page > 1).then(|| page_url(page - 1)),
        next_url: (page < total_pages).then(|| page_url(page + 1)),
        notice: query.notice.as_deref().map(notice_message),
        error: query.error.as_deref().map(error_message),
    })
}

/// Display the blank create form.
#[instrument(skip(state, admin))]
pub async fn new_form(
    RequireEditor(admin): RequireEditor,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<ProductFormTemplate> {
    let category_rows = CategoryRepository::new(state.pool()).list_all().await?;

    Ok(ProductFormTemplate {
        ctx: AdminContext::from(&admin),
        heading: "New product".to_owned(),
        action: "/products".to_owned(),
        delete_action: None,
        categories: category_options(category_rows),
        name: String::new(),
        slug: String::new(),
        description: String::new(),
        image: String::new(),
        price: String::new(),
        in_stock: true,
        category_id: 0,
        variants_text: String::new(),
        notice: query.notice.as_deref().map(notice_message),
        error: query.error.as_deref().map(error_message),
    })
}

/// Display the edit form for an existing product.
#[instrument(skip(state, admin))]
pub async fn edit_form(
    RequireEditor(admin): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<MessageQuery>,
) -> Result<ProductFormTemplate> {
    let id = ProductId::new(id);
    let products = ProductRepository::new(state.pool());
    let categories = CategoryRepository::new(state.pool());

    let (product, variants, category_rows) = tokio::try_join!(
        products.get_by_id(id),
        products.variants_for(id),
        categories.list_all(),
    )?;
    let product = product.ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(ProductFormTemplate {
        ctx: AdminContext::from(&admin),
        heading: format!("Edit {}", product.name),
        action: format!("/products/{}", product.id.as_i32()),
        delete_action: Some(format!("/products/{}/delete", product.id.as_i32())),
        categories: category_options(category_rows),
        name: product.name,
        slug: product.slug,
        description: product.description,
        image: product.image.unwrap_or_default(),
        price: product.price.amount().to_string(),
        in_stock: product.in_stock,
        category_id: product.category_id.as_i32(),
        variants_text: variants_text(&variants),
        notice: query.notice.as_deref().map(notice_message),
        error: query.error.as_deref().map(error_message),
    })
}

/// Handle product creation.
#[instrument(skip(state, admin, form))]
pub async fn create(
    RequireEditor(admin): RequireEditor,
    State(state): State<AppState>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let parsed = match ParsedForm::try_from_form(&form) {
        Ok(parsed) => parsed,
        Err(code) => {
            return Ok(Redirect::to(&format!("/products/new?error={code}")).into_response());
        }
    };

    let repo = ProductRepository::new(state.pool());
    let product = match repo.create(parsed.new_product()).await {
        Ok(product) => product,
        Err(RepositoryError::Conflict(_)) => {
            return Ok(Redirect::to("/products/new?error=slug_taken").into_response());
        }
        Err(e) => return Err(e.into()),
    };
    if !parsed.variants.is_empty() {
        repo.replace_variants(product.id, &parsed.variants).await?;
    }

    tracing::info!(
        admin_id = admin.id.as_i32(),
        product_id = product.id.as_i32(),
        "Product created"
    );
    Ok(Redirect::to(&format!("/products/{}/edit?notice=created", product.id.as_i32()))
        .into_response())
}

/// Handle product update.
#[instrument(skip(state, admin, form))]
pub async fn update(
    RequireEditor(admin): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let edit_url = |suffix: &str| format!("/products/{id}/edit{suffix}");
    let parsed = match ParsedForm::try_from_form(&form) {
        Ok(parsed) => parsed,
        Err(code) => {
            return Ok(Redirect::to(&edit_url(&format!("?error={code}"))).into_response());
        }
    };

    let repo = ProductRepository::new(state.pool());
    match repo.update(ProductId::new(id), parsed.new_product()).await {
        Ok(product) => {
            repo.replace_variants(product.id, &parsed.variants).await?;
            tracing::info!(
                admin_id = admin.id.as_i32(),
                product_id = product.id.as_i32(),
                "Product updated"
            );
            Ok(Redirect::to(&edit_url("?notice=saved")).into_response())
        }
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/products?error=missing").into_response())
        }
        Err(RepositoryError::Conflict(_)) => {
            Ok(Redirect::to(&edit_url("?error=slug_taken")).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle product deletion.
#[instrument(skip(state, admin))]
pub async fn delete(
    RequireEditor(admin): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response> {
    match ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await
    {
        Ok(()) => {
            tracing::info!(admin_id = admin.id.as_i32(), product_id = id, "Product deleted");
            Ok(Redirect::to("/products?notice=deleted").into_response())
        }
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/products?error=missing").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Form fields after validation, ready to hand to the repository.
struct ParsedForm {
    name: String,
    slug: String,
    description: String,
    image: Option<String>,
    price: Price,
    in_stock: bool,
    category_id: CategoryId,
    variants: Vec<(Decimal, Price)>,
}

impl ParsedForm {
    /// Validate raw form input. The error is a redirect code for the form
    /// page, not a message.
    fn try_from_form(form: &ProductForm) -> std::result::Result<Self, &'static str> {
        let name = form.name.trim().to_owned();
        let slug = form.slug.trim().to_lowercase();
        let Some(category_id) = form
            .category_id
            .parse::<i32>()
            .ok()
            .filter(|id| *id > 0)
            .map(CategoryId::new)
        else {
            return Err("invalid");
        };
        if name.is_empty() || !valid_slug(&slug) {
            return Err("invalid");
        }

        let variants =
            parse_variants(form.variants.as_deref().unwrap_or("")).map_err(|_| "variants")?;

        // With variants present the catalog shows the first variant's
        // price, so the form's price field only matters without them.
        let price = if let Some((_, first_price)) = variants.first() {
            *first_price
        } else {
            form.price
                .trim()
                .parse::<Decimal>()
                .ok()
                .filter(|p| !p.is_sign_negative())
                .map(Price::new)
                .ok_or("price")?
        };

        let image = form
            .image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        Ok(Self {
            name,
            slug,
            description: form.description.trim().to_owned(),
            image,
            price,
            in_stock: form.in_stock.is_some(),
            category_id,
            variants,
        })
    }

    fn new_product(&self) -> NewProduct<'_> {
        NewProduct {
            category_id: self.category_id,
            name: &self.name,
            slug: &self.slug,
            description: &self.description,
            image: self.image.as_deref(),
            price: self.price,
            in_stock: self.in_stock,
        }
    }
}

/// Parse the variants textarea: one `weight price` pair per line, comma or
/// whitespace separated. Weights must be positive and unique; prices
/// non-negative.
fn parse_variants(text: &str) -> std::result::Result<Vec<(Decimal, Price)>, String> {
    let mut variants: Vec<(Decimal, Price)> = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let n = index + 1;
        let tokens: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        let [weight, price] = tokens[..] else {
            return Err(format!("line {n}: expected \"weight price\""));
        };
        let weight = weight
            .parse::<Decimal>()
            .map_err(|_| format!("line {n}: bad weight"))?;
        if weight <= Decimal::ZERO {
            return Err(format!("line {n}: weight must be positive"));
        }
        let price = price
            .parse::<Decimal>()
            .map_err(|_| format!("line {n}: bad price"))?;
        if price.is_sign_negative() {
            return Err(format!("line {n}: price must not be negative"));
        }
        if variants.iter().any(|(w, _)| *w == weight) {
            return Err(format!("line {n}: duplicate weight"));
        }
        variants.push((weight, Price::new(price)));
    }
    Ok(variants)
}

/// Render stored variants back into the textarea format.
fn variants_text(variants: &[ProductVariant]) -> String {
    variants
        .iter()
        .map(|v| format!("{} {}", v.weight, v.price.amount()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Flatten the category tree into indented select options.
fn category_options(rows: Vec<Category>) -> Vec<CategoryOptionView> {
    CategoryTree::build(rows)
        .flatten()
        .into_iter()
        .map(|entry| CategoryOptionView {
            id: entry.id.as_i32(),
            label: format!("{}{}", "\u{2003}".repeat(entry.level), entry.name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(variants: &[(Decimal, Price)]) -> Vec<String> {
        variants.iter().map(|(w, _)| w.to_string()).collect()
    }

    #[test]
    fn test_parse_variants_happy_path() {
        let variants = parse_variants("0.5 7.90\n2.5, 24.50\n\n10 79.00\n").unwrap();
        assert_eq!(weights(&variants), vec!["0.5", "2.5", "10"]);
        assert_eq!(variants[1].1.to_string(), "$24.50");
    }

    #[test]
    fn test_parse_variants_empty_text() {
        assert!(parse_variants("").unwrap().is_empty());
        assert!(parse_variants("  \n \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_variants_rejects_bad_lines() {
        assert!(parse_variants("just-one-token").is_err());
        assert!(parse_variants("0.5 7.90 extra").is_err());
        assert!(parse_variants("abc 7.90").is_err());
        assert!(parse_variants("0.5 abc").is_err());
        assert!(parse_variants("0 7.90").is_err());
        assert!(parse_variants("-1 7.90").is_err());
        assert!(parse_variants("0.5 -7.90").is_err());
    }

    #[test]
    fn test_parse_variants_rejects_duplicate_weight() {
        let err = parse_variants("0.5 7.90\n0.50 8.90").unwrap_err();
        assert!(err.contains("duplicate"), "{err}");
    }

    #[test]
    fn test_variants_text_round_trip() {
        let text = "0.5 7.90\n2.5 24.50";
        let parsed = parse_variants(text).unwrap();
        let rendered: Vec<ProductVariant> = parsed
            .iter()
            .enumerate()
            .map(|(i, (weight, price))| ProductVariant {
                id: paws_core::VariantId::new(i32::try_from(i).unwrap() + 1),
                product_id: ProductId::new(1),
                weight: *weight,
                price: *price,
                position: i32::try_from(i).unwrap(),
            })
            .collect();
        assert_eq!(variants_text(&rendered), "0.5 7.90\n2.5 24.50");
    }
}
