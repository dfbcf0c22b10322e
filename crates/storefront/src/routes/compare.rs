//! Comparison route handlers.
//!
//! The comparison list keys entries by product and weight, the same
//! identity the cart uses: a 2kg and a 10kg bag of the same food compare
//! as different entries.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use paws_core::ProductId;
use paws_core::collection::{Collection, CollectionKind};

use crate::collections::{load_collection, save_collection};
use crate::db::{ProductRepository, RepositoryError};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::BaseContext;
use crate::routes::products::snapshot_for;
use crate::state::AppState;

/// One column of the comparison table.
///
/// Name, price, and image come from the session snapshot; stock and the
/// description are looked up fresh so the table reflects the catalog.
#[derive(Clone)]
pub struct CompareEntryView {
    pub product_id: i32,
    pub name: String,
    pub slug: Option<String>,
    /// Normalized weight string, doubles as the form value.
    pub weight: Option<String>,
    pub price: String,
    pub image: Option<String>,
    pub in_stock: Option<bool>,
    pub description: Option<String>,
}

/// Toggle compare entry form data.
#[derive(Debug, Deserialize)]
pub struct ToggleCompareForm {
    pub product_id: i32,
    pub weight: Option<Decimal>,
}

/// Remove compare entry form data.
#[derive(Debug, Deserialize)]
pub struct RemoveCompareForm {
    pub product_id: i32,
    pub weight: Option<Decimal>,
}

/// Comparison page template.
#[derive(Template, WebTemplate)]
#[template(path = "compare/show.html")]
pub struct CompareShowTemplate {
    pub base: BaseContext,
    pub entries: Vec<CompareEntryView>,
}

/// Comparison table fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/compare_table.html")]
pub struct CompareTableTemplate {
    pub entries: Vec<CompareEntryView>,
}

/// Comparison count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/compare_count.html")]
pub struct CompareCountTemplate {
    pub count: u32,
}

/// Build the comparison columns, enriching each snapshot with live
/// catalog data. A deleted product keeps its column but loses the link,
/// stock flag, and description.
async fn compare_entries(
    state: &AppState,
    compare: &Collection,
) -> Result<Vec<CompareEntryView>, RepositoryError> {
    let repo = ProductRepository::new(state.pool());
    let mut entries = Vec::with_capacity(compare.len());

    for item in compare.items() {
        let product = repo.get_by_id(item.product_id).await?;
        entries.push(CompareEntryView {
            product_id: item.product_id.as_i32(),
            name: item.name.clone(),
            slug: product.as_ref().map(|p| p.slug.clone()),
            weight: item.weight.map(|w| w.normalize().to_string()),
            price: item.price.to_string(),
            image: item.image.clone(),
            in_stock: product.as_ref().map(|p| p.in_stock),
            description: product.map(|p| p.description),
        });
    }

    Ok(entries)
}

/// Display the comparison page.
#[instrument(skip(state, user, session))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> crate::error::Result<impl IntoResponse> {
    let compare = load_collection(&session, CollectionKind::Compare).await;
    let entries = compare_entries(&state, &compare).await?;

    Ok(CompareShowTemplate {
        base: BaseContext::load(&state, user.as_ref()).await,
        entries,
    })
}

/// Toggle an entry in the comparison list (HTMX).
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ToggleCompareForm>,
) -> Response {
    let snapshot = match snapshot_for(&state, ProductId::new(form.product_id), form.weight).await {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Html("<span class=\"form-error\">This product is no longer available</span>"),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Failed to load product for compare toggle: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"form-error\">Error updating comparison</span>"),
            )
                .into_response();
        }
    };

    let mut compare = load_collection(&session, CollectionKind::Compare).await;
    compare.toggle(snapshot);

    if let Err(e) = save_collection(&session, CollectionKind::Compare, &compare).await {
        tracing::error!("Failed to save comparison to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "compare-updated")]),
        CompareCountTemplate {
            count: compare.item_count(),
        },
    )
        .into_response()
}

/// Remove an entry from the comparison list (HTMX). Returns the refreshed
/// table fragment.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveCompareForm>,
) -> Response {
    let mut compare = load_collection(&session, CollectionKind::Compare).await;
    compare.remove(ProductId::new(form.product_id), form.weight);

    if let Err(e) = save_collection(&session, CollectionKind::Compare, &compare).await {
        tracing::error!("Failed to save comparison to session: {e}");
    }

    match compare_entries(&state, &compare).await {
        Ok(entries) => (
            AppendHeaders([("HX-Trigger", "compare-updated")]),
            CompareTableTemplate { entries },
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to rebuild comparison table: {e}");
            (
                AppendHeaders([("HX-Trigger", "compare-updated")]),
                CompareTableTemplate {
                    entries: Vec::new(),
                },
            )
                .into_response()
        }
    }
}

/// Get the comparison count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let compare = load_collection(&session, CollectionKind::Compare).await;

    CompareCountTemplate {
        count: compare.item_count(),
    }
}
