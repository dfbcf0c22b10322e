//! Admin user management routes, super admin only.
//!
//! New accounts are created directly with a password the super admin hands
//! over out of band. Accounts are never deleted, only deactivated, so the
//! audit trail of who changed what stays intact.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use paws_core::AdminRole;

use crate::db::{AdminUserRepository, RepositoryError};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireSuperAdmin;
use crate::routes::AdminContext;
use crate::services::{AdminAuthError, AdminAuthService, MIN_PASSWORD_LENGTH};
use crate::state::AppState;

/// One row in the admin account table.
pub struct AdminUserRowView {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role_label: &'static str,
    pub is_active: bool,
    pub last_login: String,
    pub created_at: String,
    /// The signed-in super admin's own row gets no deactivate button.
    pub is_self: bool,
}

/// Role option for the create form.
pub struct RoleOptionView {
    pub value: &'static str,
    pub label: &'static str,
}

/// Admin account listing template.
#[derive(Template, WebTemplate)]
#[template(path = "admin_users/index.html")]
pub struct AdminUsersTemplate {
    pub ctx: AdminContext,
    pub admins: Vec<AdminUserRowView>,
    pub roles: Vec<RoleOptionView>,
    pub min_password_length: usize,
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
pub struct CreateAdminForm {
    pub email: String,
    pub name: String,
    pub role: String,
    pub password: String,
}

fn notice_message(code: &str) -> String {
    match code {
        "created" => "Admin account created.".to_owned(),
        "activated" => "Account activated.".to_owned(),
        "deactivated" => "Account deactivated.".to_owned(),
        _ => "Done.".to_owned(),
    }
}

fn error_message(code: &str) -> String {
    match code {
        "email" => "That email address could not be read.".to_owned(),
        "email_taken" => "An admin with this email already exists.".to_owned(),
        "password" => {
            format!("Passwords must be at least {MIN_PASSWORD_LENGTH} characters long.")
        }
        "role" => "Pick a role from the list.".to_owned(),
        "name" => "Enter a name.".to_owned(),
        "missing" => "That account no longer exists.".to_owned(),
        "self" => "You cannot deactivate your own account.".to_owned(),
        _ => "Something went wrong. Please try again.".to_owned(),
    }
}

/// Display the admin accounts and the create form.
#[instrument(skip(state, admin))]
pub async fn index(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<AdminUsersTemplate> {
    let rows = AdminUserRepository::new(state.pool()).list_all().await?;

    let admins = rows
        .into_iter()
        .map(|user| AdminUserRowView {
            id: user.id.as_i32(),
            email: user.email.to_string(),
            name: user.name,
            role_label: user.role.label(),
            is_active: user.is_active,
            last_login: user.last_login_at.map_or_else(
                || "Never".to_owned(),
                |at| at.format("%b %e, %Y %H:%M").to_string(),
            ),
            created_at: user.created_at.format("%b %e, %Y").to_string(),
            is_self: user.id == admin.id,
        })
        .collect();

    let roles = AdminRole::ALL
        .iter()
        .map(|role| RoleOptionView {
            value: role.as_str(),
            label: role.label(),
        })
        .collect();

    Ok(AdminUsersTemplate {
        ctx: AdminContext::from(&admin),
        admins,
        roles,
        min_password_length: MIN_PASSWORD_LENGTH,
        notice: query.notice.as_deref().map(notice_message),
        error: query.error.as_deref().map(error_message),
    })
}

/// Handle account creation.
#[instrument(skip(state, admin, form))]
pub async fn create(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Form(form): Form<CreateAdminForm>,
) -> Result<Response> {
    let name = form.name.trim();
    if name.is_empty() {
        return Ok(Redirect::to("/admins?error=name").into_response());
    }
    let Ok(role) = form.role.parse::<AdminRole>() else {
        return Ok(Redirect::to("/admins?error=role").into_response());
    };

    match AdminAuthService::new(state.pool())
        .create_admin(&form.email, name, role, &form.password)
        .await
    {
        Ok(created) => {
            tracing::info!(
                admin_id = admin.id.as_i32(),
                created_id = created.id.as_i32(),
                role = role.as_str(),
                "Admin account created"
            );
            Ok(Redirect::to("/admins?notice=created").into_response())
        }
        Err(AdminAuthError::InvalidEmail(_)) => {
            Ok(Redirect::to("/admins?error=email").into_response())
        }
        Err(AdminAuthError::EmailTaken) => {
            Ok(Redirect::to("/admins?error=email_taken").into_response())
        }
        Err(AdminAuthError::WeakPassword(_)) => {
            Ok(Redirect::to("/admins?error=password").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Flip an account between active and deactivated.
#[instrument(skip(state, admin))]
pub async fn toggle_active(
    RequireSuperAdmin(admin): RequireSuperAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response> {
    if id == admin.id.as_i32() {
        return Ok(Redirect::to("/admins?error=self").into_response());
    }

    let repo = AdminUserRepository::new(state.pool());
    let Some(user) = repo.get_by_id(paws_core::AdminUserId::new(id)).await? else {
        return Ok(Redirect::to("/admins?error=missing").into_response());
    };

    match repo.set_active(user.id, !user.is_active).await {
        Ok(updated) => {
            tracing::info!(
                admin_id = admin.id.as_i32(),
                target_id = updated.id.as_i32(),
                is_active = updated.is_active,
                "Admin account toggled"
            );
            let notice = if updated.is_active { "activated" } else { "deactivated" };
            Ok(Redirect::to(&format!("/admins?notice={notice}")).into_response())
        }
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/admins?error=missing").into_response())
        }
        Err(e) => Err(e.into()),
    }
}
