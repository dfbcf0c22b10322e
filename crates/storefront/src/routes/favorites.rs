//! Favorites route handlers.
//!
//! Favorites track whole products; toggling with any weight variant of a
//! product flips the same entry.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use paws_core::ProductId;
use paws_core::collection::{Collection, CollectionKind};

use crate::collections::{load_collection, save_collection};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::BaseContext;
use crate::routes::products::snapshot_for;
use crate::state::AppState;

/// Favorite entry display data.
#[derive(Clone)]
pub struct FavoriteView {
    pub product_id: i32,
    pub name: String,
    pub price: String,
    pub image: Option<String>,
}

fn favorite_views(favorites: &Collection) -> Vec<FavoriteView> {
    favorites
        .items()
        .iter()
        .map(|item| FavoriteView {
            product_id: item.product_id.as_i32(),
            name: item.name.clone(),
            price: item.price.to_string(),
            image: item.image.clone(),
        })
        .collect()
}

/// Toggle favorite form data.
#[derive(Debug, Deserialize)]
pub struct ToggleFavoriteForm {
    pub product_id: i32,
}

/// Favorites page template.
#[derive(Template, WebTemplate)]
#[template(path = "favorites/show.html")]
pub struct FavoritesShowTemplate {
    pub base: BaseContext,
    pub favorites: Vec<FavoriteView>,
}

/// Favorites count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/favorites_count.html")]
pub struct FavoritesCountTemplate {
    pub count: u32,
}

/// Display the favorites page.
#[instrument(skip(state, user, session))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> impl IntoResponse {
    let favorites = load_collection(&session, CollectionKind::Favorites).await;

    FavoritesShowTemplate {
        base: BaseContext::load(&state, user.as_ref()).await,
        favorites: favorite_views(&favorites),
    }
}

/// Toggle a product in the favorites (HTMX).
///
/// Returns the count badge plus an HTMX trigger so the favorites page can
/// refresh its grid.
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ToggleFavoriteForm>,
) -> Response {
    let snapshot = match snapshot_for(&state, ProductId::new(form.product_id), None).await {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Html("<span class=\"form-error\">This product is no longer available</span>"),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!("Failed to load product for favorites toggle: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"form-error\">Error updating favorites</span>"),
            )
                .into_response();
        }
    };

    let mut favorites = load_collection(&session, CollectionKind::Favorites).await;
    favorites.toggle(snapshot);

    if let Err(e) = save_collection(&session, CollectionKind::Favorites, &favorites).await {
        tracing::error!("Failed to save favorites to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "favorites-updated")]),
        FavoritesCountTemplate {
            count: favorites.item_count(),
        },
    )
        .into_response()
}

/// Get the favorites count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let favorites = load_collection(&session, CollectionKind::Favorites).await;

    FavoritesCountTemplate {
        count: favorites.item_count(),
    }
}
