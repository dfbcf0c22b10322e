//! Checkout route handlers.
//!
//! Validation failures re-render the form with the submitted values and an
//! inline message rather than bouncing through a redirect; a successful
//! order clears the cart and redirects to the confirmation page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use paws_core::collection::CollectionKind;
use paws_core::models::PickupPoint;

use crate::collections::{load_collection, save_collection};
use crate::db::PickupPointRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::BaseContext;
use crate::routes::cart::CartView;
use crate::services::{AuthService, CheckoutError, CheckoutForm, CheckoutService};
use crate::state::AppState;

/// Pickup point option for the checkout dropdown.
#[derive(Clone)]
pub struct PickupPointView {
    pub id: i32,
    pub label: String,
}

impl From<&PickupPoint> for PickupPointView {
    fn from(point: &PickupPoint) -> Self {
        let label = match &point.phone {
            Some(phone) => format!("{}, {} ({phone})", point.city, point.address),
            None => format!("{}, {}", point.city, point.address),
        };
        Self {
            id: point.id.as_i32(),
            label,
        }
    }
}

/// Form values echoed back into the template, empty on first render.
#[derive(Clone, Default)]
pub struct CheckoutFormValues {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub pickup_point_id: Option<i32>,
    pub comment: String,
}

impl CheckoutFormValues {
    /// Whether this pickup point is the selected one, for `selected` markers.
    #[must_use]
    pub fn is_pickup(&self, id: i32) -> bool {
        self.pickup_point_id == Some(id)
    }
}

impl From<&CheckoutForm> for CheckoutFormValues {
    fn from(form: &CheckoutForm) -> Self {
        Self {
            customer_name: form.customer_name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            address: form.address.clone().unwrap_or_default(),
            pickup_point_id: form.pickup_point().map(|id| id.as_i32()),
            comment: form.comment.clone().unwrap_or_default(),
        }
    }
}

/// Checkout form page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/form.html")]
pub struct CheckoutTemplate {
    pub base: BaseContext,
    pub cart: CartView,
    pub pickup_points: Vec<PickupPointView>,
    pub form: CheckoutFormValues,
    pub error: Option<String>,
}

/// Order confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/success.html")]
pub struct CheckoutSuccessTemplate {
    pub base: BaseContext,
    pub order_id: Option<i32>,
}

/// Query parameters for the confirmation page.
#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    pub order: Option<i32>,
}

/// Display the checkout form. An empty cart goes back to the cart page.
///
/// Logged-in customers get their contact details prefilled.
#[instrument(skip(state, user, session))]
pub async fn form(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
) -> Result<Response> {
    let cart = load_collection(&session, CollectionKind::Cart).await;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let pickup_points = PickupPointRepository::new(state.pool()).list_all().await?;

    let form = match &user {
        Some(current) => match AuthService::new(state.pool()).get_user(current.id).await {
            Ok(account) => CheckoutFormValues {
                customer_name: account.name,
                email: account.email.to_string(),
                phone: account.phone,
                ..CheckoutFormValues::default()
            },
            // A stale session still checks out as a guest would.
            Err(_) => CheckoutFormValues {
                customer_name: current.name.clone(),
                email: current.email.to_string(),
                ..CheckoutFormValues::default()
            },
        },
        None => CheckoutFormValues::default(),
    };

    Ok(CheckoutTemplate {
        base: BaseContext::load(&state, user.as_ref()).await,
        cart: CartView::from(&cart),
        pickup_points: pickup_points.iter().map(PickupPointView::from).collect(),
        form,
        error: None,
    }
    .into_response())
}

/// Place the order.
#[instrument(skip(state, user, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let cart = load_collection(&session, CollectionKind::Cart).await;
    let service = CheckoutService::new(state.pool());

    match service
        .place_order(user.as_ref().map(|u| u.id), &cart, &form)
        .await
    {
        Ok(order) => {
            save_collection(&session, CollectionKind::Cart, &CollectionKind::Cart.empty()).await?;
            tracing::info!(order_id = order.id.as_i32(), "Order placed");
            Ok(
                Redirect::to(&format!("/checkout/success?order={}", order.id.as_i32()))
                    .into_response(),
            )
        }
        Err(CheckoutError::EmptyCart) => Ok(Redirect::to("/cart").into_response()),
        Err(CheckoutError::Validation(message)) => {
            let pickup_points = PickupPointRepository::new(state.pool()).list_all().await?;
            Ok(CheckoutTemplate {
                base: BaseContext::load(&state, user.as_ref()).await,
                cart: CartView::from(&cart),
                pickup_points: pickup_points.iter().map(PickupPointView::from).collect(),
                form: CheckoutFormValues::from(&form),
                error: Some(message),
            }
            .into_response())
        }
        Err(CheckoutError::Database(e)) => Err(AppError::from(e)),
    }
}

/// Display the order confirmation page.
#[instrument(skip(state, user))]
pub async fn success(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<SuccessQuery>,
) -> impl IntoResponse {
    CheckoutSuccessTemplate {
        base: BaseContext::load(&state, user.as_ref()).await,
        order_id: query.order,
    }
}
