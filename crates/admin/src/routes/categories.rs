//! Category management routes.
//!
//! The tree renders as a flat table indented by depth, with a create form
//! beside it. Deletes re-parent children to the deleted node's parent and
//! move its products up one level; a root category that still has products
//! cannot be deleted because its products would have nowhere to go.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use paws_core::CategoryId;
use paws_core::catalog::CategoryTree;

use crate::db::{CategoryRepository, RepositoryError};
use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAdminAuth, RequireEditor};
use crate::routes::{AdminContext, valid_slug};
use crate::state::AppState;

/// One row in the category table, indented by tree depth.
pub struct CategoryRowView {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub indent: String,
    pub is_root: bool,
}

/// Category listing template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesTemplate {
    pub ctx: AdminContext,
    pub categories: Vec<CategoryRowView>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Query parameters carried through the POST-redirect-GET cycle.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Create form data.
#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
    pub slug: String,
    pub parent_id: Option<String>,
}

fn notice_message(code: &str) -> String {
    match code {
        "created" => "Category created.".to_owned(),
        "deleted" => "Category deleted.".to_owned(),
        _ => "Done.".to_owned(),
    }
}

fn error_message(code: &str) -> String {
    match code {
        "invalid" => "Enter a name and a slug (lowercase letters, digits, hyphens).".to_owned(),
        "slug_taken" => "That slug is already in use.".to_owned(),
        "missing" => "That category no longer exists.".to_owned(),
        "has_products" => {
            "A top-level category with products cannot be deleted. Move its products first."
                .to_owned()
        }
        _ => "Something went wrong. Please try again.".to_owned(),
    }
}

/// Display the category tree and create form.
#[instrument(skip(state, admin))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<CategoriesTemplate> {
    let rows = CategoryRepository::new(state.pool()).list_all().await?;
    let tree = CategoryTree::build(rows);
    if !tree.orphans.is_empty() {
        tracing::warn!(orphans = ?tree.orphans, "Categories with broken parent chains");
    }

    let categories = tree
        .flatten()
        .into_iter()
        .map(|entry| CategoryRowView {
            id: entry.id.as_i32(),
            name: entry.name,
            slug: entry.slug,
            indent: "\u{2003}".repeat(entry.level),
            is_root: entry.level == 0,
        })
        .collect();

    Ok(CategoriesTemplate {
        ctx: AdminContext::from(&admin),
        categories,
        notice: query.notice.as_deref().map(notice_message),
        error: query.error.as_deref().map(error_message),
    })
}

/// Handle category creation.
#[instrument(skip(state, admin, form))]
pub async fn create(
    RequireEditor(admin): RequireEditor,
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let name = form.name.trim();
    let slug = form.slug.trim().to_lowercase();
    if name.is_empty() || !valid_slug(&slug) {
        return Ok(Redirect::to("/categories?error=invalid").into_response());
    }
    let parent_id = parse_parent(form.parent_id.as_deref());

    let repo = CategoryRepository::new(state.pool());
    match repo.create(name, &slug, parent_id).await {
        Ok(category) => {
            tracing::info!(
                admin_id = admin.id.as_i32(),
                category_id = category.id.as_i32(),
                "Category created"
            );
            Ok(Redirect::to("/categories?notice=created").into_response())
        }
        Err(RepositoryError::Conflict(_)) => {
            Ok(Redirect::to("/categories?error=slug_taken").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Handle category deletion.
#[instrument(skip(state, admin))]
pub async fn delete(
    RequireEditor(admin): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response> {
    let repo = CategoryRepository::new(state.pool());
    match repo.delete(CategoryId::new(id)).await {
        Ok(()) => {
            tracing::info!(
                admin_id = admin.id.as_i32(),
                category_id = id,
                "Category deleted"
            );
            Ok(Redirect::to("/categories?notice=deleted").into_response())
        }
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/categories?error=missing").into_response())
        }
        Err(RepositoryError::Conflict(_)) => {
            Ok(Redirect::to("/categories?error=has_products").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// A blank or unparseable parent select value means a root category.
fn parse_parent(raw: Option<&str>) -> Option<CategoryId> {
    raw.filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<i32>().ok())
        .map(CategoryId::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_parent() {
        assert_eq!(parse_parent(None), None);
        assert_eq!(parse_parent(Some("")), None);
        assert_eq!(parse_parent(Some("banana")), None);
        assert_eq!(parse_parent(Some("7")), Some(CategoryId::new(7)));
    }
}
