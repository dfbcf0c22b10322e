//! Account route handlers.
//!
//! These routes require authentication. A session that names a user who no
//! longer exists is cleared and sent back to the login page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use paws_core::OrderId;
use paws_core::models::{Order, OrderItem};

use crate::db::{OrderRepository, PickupPointRepository, RepositoryError, UserRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::routes::BaseContext;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Profile display data for templates.
#[derive(Clone)]
pub struct ProfileView {
    pub email: String,
    pub name: String,
    pub phone: String,
}

impl From<&User> for ProfileView {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.to_string(),
            name: user.name.clone(),
            phone: user.phone.clone(),
        }
    }
}

/// Order list row display data.
#[derive(Clone)]
pub struct OrderRowView {
    pub id: i32,
    pub date: String,
    pub status: &'static str,
    pub total: String,
}

impl From<&Order> for OrderRowView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i32(),
            date: order.created_at.format("%b %e, %Y").to_string(),
            status: order.status.label(),
            total: order.total.to_string(),
        }
    }
}

/// Order line item display data.
#[derive(Clone)]
pub struct OrderItemView {
    pub name: String,
    pub weight: Option<String>,
    pub quantity: i32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            name: item.product_name.clone(),
            weight: item.weight.map(|w| w.normalize().to_string()),
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
            line_total: item.line_total().to_string(),
        }
    }
}

/// Full order display data for the detail page.
pub struct OrderDetailView {
    pub id: i32,
    pub date: String,
    pub status: &'static str,
    pub total: String,
    /// Pickup point label or delivery address.
    pub fulfillment: String,
    pub comment: Option<String>,
    pub items: Vec<OrderItemView>,
}

/// Query parameters for profile update feedback.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub success: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Account overview page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountIndexTemplate {
    pub base: BaseContext,
    pub profile: ProfileView,
    pub orders: Vec<OrderRowView>,
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/order.html")]
pub struct AccountOrderTemplate {
    pub base: BaseContext,
    pub order: OrderDetailView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the account overview: profile details and order history.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<Response> {
    let user = match AuthService::new(state.pool()).get_user(current.id).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            return Ok(expire_session(&session).await);
        }
        Err(e) => return Err(AppError::from(e)),
    };

    let orders = OrderRepository::new(state.pool())
        .list_for_user(current.id)
        .await?;

    let success = query.success.as_deref().map(|code| match code {
        "profile_updated" => "Your profile has been updated.".to_owned(),
        _ => "Done.".to_owned(),
    });
    let error = query.error.as_deref().map(|code| match code {
        "name_required" => "Please enter your name.".to_owned(),
        _ => "Something went wrong. Please try again.".to_owned(),
    });

    Ok(AccountIndexTemplate {
        base: BaseContext::load(&state, Some(&current)).await,
        profile: ProfileView::from(&user),
        orders: orders.iter().map(OrderRowView::from).collect(),
        success,
        error,
    }
    .into_response())
}

/// Display one order with its line items.
///
/// The lookup is scoped to the logged-in user, so guessing another
/// customer's order id yields a 404.
#[instrument(skip(state))]
pub async fn order_detail(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response> {
    let order_id = OrderId::new(id);
    let Some((order, items)) = OrderRepository::new(state.pool())
        .get_for_user(order_id, current.id)
        .await?
    else {
        return Err(AppError::NotFound(format!("order {id}")));
    };

    let fulfillment = fulfillment_label(&state, &order).await;

    let detail = OrderDetailView {
        id: order.id.as_i32(),
        date: order.created_at.format("%b %e, %Y").to_string(),
        status: order.status.label(),
        total: order.total.to_string(),
        fulfillment,
        comment: order.comment.clone(),
        items: items.iter().map(OrderItemView::from).collect(),
    };

    Ok(AccountOrderTemplate {
        base: BaseContext::load(&state, Some(&current)).await,
        order: detail,
    }
    .into_response())
}

/// Profile update form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub name: String,
    pub phone: String,
}

/// Handle profile update form submission.
#[instrument(skip(state, session, form))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let name = form.name.trim();
    if name.is_empty() {
        return Ok(Redirect::to("/account?error=name_required").into_response());
    }

    let user = match UserRepository::new(state.pool())
        .update_profile(current.id, name, form.phone.trim())
        .await
    {
        Ok(user) => user,
        Err(RepositoryError::NotFound) => {
            return Ok(expire_session(&session).await);
        }
        Err(e) => return Err(AppError::from(e)),
    };

    // Refresh the session copy so the header greeting picks up the new name.
    let refreshed = CurrentUser {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
    };
    if let Err(e) = set_current_user(&session, &refreshed).await {
        tracing::error!("Failed to refresh session user after profile update: {e}");
    }

    Ok(Redirect::to("/account?success=profile_updated").into_response())
}

/// Describe where an order goes: the pickup point or the delivery address.
async fn fulfillment_label(state: &AppState, order: &Order) -> String {
    if let Some(point_id) = order.pickup_point_id {
        return match PickupPointRepository::new(state.pool())
            .get_by_id(point_id)
            .await
        {
            Ok(Some(point)) => format!("Pickup: {}, {}", point.city, point.address),
            Ok(None) => format!("Pickup point #{}", point_id.as_i32()),
            Err(e) => {
                tracing::error!("Failed to load pickup point for order: {e}");
                format!("Pickup point #{}", point_id.as_i32())
            }
        };
    }

    order
        .address
        .clone()
        .map_or_else(|| "Not specified".to_owned(), |a| format!("Delivery: {a}"))
}

/// Clear a stale identity and send the customer back to the login page.
async fn expire_session(session: &Session) -> Response {
    if let Err(e) = clear_current_user(session).await {
        tracing::error!("Failed to clear stale session user: {e}");
    }
    Redirect::to("/auth/login?error=session_expired").into_response()
}
