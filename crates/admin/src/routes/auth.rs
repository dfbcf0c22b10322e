//! Authentication route handlers for the admin panel.
//!
//! Email + password login against the `admin.admin_users` table. Failed
//! submissions redirect back with an `?error=code` query so a page refresh
//! never re-posts credentials.

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

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::{AdminAuthError, AdminAuthService};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Translate a redirect error code into a message.
fn error_message(code: &str) -> String {
    match code {
        "credentials" => "Invalid email or password.".to_owned(),
        "disabled" => "This account has been disabled.".to_owned(),
        "session" => "Could not start a session. Please try again.".to_owned(),
        _ => "Something went wrong. Please try again.".to_owned(),
    }
}

/// Display the login page. An admin with a live session goes straight to
/// the dashboard.
pub async fn login_page(
    OptionalAdminAuth(admin): OptionalAdminAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if admin.is_some() {
        return Redirect::to("/").into_response();
    }
    LoginTemplate {
        error: query.error.as_deref().map(error_message),
    }
    .into_response()
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match AdminAuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(admin) => {
            let current = CurrentAdmin {
                id: admin.id,
                email: admin.email.clone(),
                name: admin.name.clone(),
                role: admin.role,
            };
            if let Err(e) = establish_session(&session, &current).await {
                tracing::error!("Failed to establish session after login: {e}");
                return Redirect::to("/auth/login?error=session").into_response();
            }
            set_sentry_user(&admin.id, Some(admin.email.as_str()));
            tracing::info!(admin_id = admin.id.as_i32(), "Admin logged in");
            Redirect::to("/").into_response()
        }
        Err(AdminAuthError::AccountDisabled) => {
            tracing::warn!("Login rejected: account disabled");
            Redirect::to("/auth/login?error=disabled").into_response()
        }
        Err(AdminAuthError::InvalidCredentials | AdminAuthError::InvalidEmail(_)) => {
            tracing::warn!("Login rejected: invalid credentials");
            Redirect::to("/auth/login?error=credentials").into_response()
        }
        Err(e) => {
            tracing::error!("Admin login failed: {e}");
            Redirect::to("/auth/login?error=internal").into_response()
        }
    }
}

/// Handle logout. The whole session goes; the admin panel stores nothing
/// worth keeping for a logged-out visitor.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!("Failed to clear session admin: {e}");
    }
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session on logout: {e}");
    }
    clear_sentry_user();

    Redirect::to("/auth/login").into_response()
}

/// Rotate the session id before storing the identity, closing the
/// session fixation window.
async fn establish_session(
    session: &Session,
    current: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    set_current_admin(session, current).await
}
