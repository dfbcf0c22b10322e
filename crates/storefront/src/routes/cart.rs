//! Cart route handlers.
//!
//! Cart mutations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the server-side session; handlers rebuild the
//! line snapshot from the catalog on every add, so a submitted form can
//! never smuggle in its own price.

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
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::BaseContext;
use crate::routes::products::snapshot_for;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: i32,
    pub name: String,
    /// Normalized weight string, doubles as the form value.
    pub weight: Option<String>,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
    pub image: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&Collection> for CartView {
    fn from(cart: &Collection) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView {
                    product_id: item.product_id.as_i32(),
                    name: item.name.clone(),
                    weight: item.weight.map(|w| w.normalize().to_string()),
                    quantity: item.quantity,
                    price: item.price.to_string(),
                    line_total: item.line_total().to_string(),
                    image: item.image.clone(),
                })
                .collect(),
            subtotal: cart.total().to_string(),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub weight: Option<Decimal>,
    pub quantity: Option<u32>,
}

/// Update cart line form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub weight: Option<Decimal>,
    pub quantity: u32,
}

/// Remove cart line form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
    pub weight: Option<Decimal>,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub base: BaseContext,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(state, user, session))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> impl IntoResponse {
    let cart = load_collection(&session, CollectionKind::Cart).await;

    CartShowTemplate {
        base: BaseContext::load(&state, user.as_ref()).await,
        cart: CartView::from(&cart),
    }
}

/// Add an item to the cart (HTMX).
///
/// The snapshot (name, price, image) is rebuilt from the catalog here.
/// Returns the count badge plus an HTMX trigger so other fragments refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
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
            tracing::error!("Failed to load product for cart add: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"form-error\">Error adding to cart</span>"),
            )
                .into_response();
        }
    };

    let mut cart = load_collection(&session, CollectionKind::Cart).await;
    cart.add(snapshot, form.quantity.unwrap_or(1));

    if let Err(e) = save_collection(&session, CollectionKind::Cart, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response()
}

/// Update a cart line's quantity (HTMX). Quantity zero removes the line.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Response {
    let mut cart = load_collection(&session, CollectionKind::Cart).await;
    cart.set_quantity(ProductId::new(form.product_id), form.weight, form.quantity);

    if let Err(e) = save_collection(&session, CollectionKind::Cart, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Remove a cart line (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Response {
    let mut cart = load_collection(&session, CollectionKind::Cart).await;
    cart.remove(ProductId::new(form.product_id), form.weight);

    if let Err(e) = save_collection(&session, CollectionKind::Cart, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Empty the cart (HTMX).
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Response {
    let cart = CollectionKind::Cart.empty();

    if let Err(e) = save_collection(&session, CollectionKind::Cart, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Get the cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = load_collection(&session, CollectionKind::Cart).await;

    CartCountTemplate {
        count: cart.item_count(),
    }
}
