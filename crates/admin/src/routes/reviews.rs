//! Review moderation routes.
//!
//! The queue defaults to pending reviews, oldest first, so nothing waits
//! at the back forever. Approve publishes, reject hides but keeps the row
//! for the record, delete removes it outright.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use paws_core::{ReviewId, ReviewStatus};

use crate::db::{RepositoryError, ReviewRepository};
use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAdminAuth, RequireEditor};
use crate::routes::AdminContext;
use crate::routes::orders::StatusOptionView;
use crate::state::AppState;

const PAGE_SIZE: i64 = 25;

fn status_options() -> Vec<StatusOptionView> {
    ReviewStatus::ALL
        .iter()
        .map(|status| StatusOptionView {
            value: status.as_str(),
            label: status.label(),
        })
        .collect()
}

/// One row in the moderation queue.
pub struct ReviewRowView {
    pub id: i32,
    pub author_name: String,
    pub rating: i32,
    pub body: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub created_at: String,
}

/// Moderation queue template.
#[derive(Template, WebTemplate)]
#[template(path = "reviews/index.html")]
pub struct ReviewsTemplate {
    pub ctx: AdminContext,
    pub reviews: Vec<ReviewRowView>,
    pub statuses: Vec<StatusOptionView>,
    pub status: String,
    pub page: i64,
    pub total_pages: i64,
    pub total: i64,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Query parameters for the queue: filter plus redirect messages.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

fn notice_message(code: &str) -> String {
    match code {
        "approved" => "Review approved.".to_owned(),
        "rejected" => "Review rejected.".to_owned(),
        "deleted" => "Review deleted.".to_owned(),
        _ => "Done.".to_owned(),
    }
}

fn error_message(code: &str) -> String {
    match code {
        "missing" => "That review no longer exists.".to_owned(),
        _ => "Something went wrong. Please try again.".to_owned(),
    }
}

/// Display the moderation queue. Defaults to pending reviews.
#[instrument(skip(state, admin))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<ReviewsTemplate> {
    let status = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<ReviewStatus>().ok())
        .unwrap_or(ReviewStatus::Pending);
    let page = query.page.unwrap_or(1).max(1);

    let repo = ReviewRepository::new(state.pool());
    let (rows, total) = tokio::try_join!(
        repo.list_with_status(status, PAGE_SIZE, (page - 1) * PAGE_SIZE),
        repo.count_with_status(status),
    )?;

    let total_pages = ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
    let page_url = |p: i64| format!("/reviews?page={p}&status={}", status.as_str());

    Ok(ReviewsTemplate {
        ctx: AdminContext::from(&admin),
        reviews: rows
            .into_iter()
            .map(|review| ReviewRowView {
                id: review.id.as_i32(),
                author_name: review.author_name,
                rating: review.rating,
                body: review.body,
                status: review.status.as_str(),
                status_label: review.status.label(),
                created_at: review.created_at.format("%b %e, %Y").to_string(),
            })
            .collect(),
        statuses: status_options(),
        status: status.as_str().to_owned(),
        page,
        total_pages,
        total,
        prev_url: (page > 1).then(|| page_url(page - 1)),
        next_url: (page < total_pages).then(|| page_url(page + 1)),
        notice: query.notice.as_deref().map(notice_message),
        error: query.error.as_deref().map(error_message),
    })
}

/// Publish a review on the storefront.
#[instrument(skip(state, admin))]
pub async fn approve(
    RequireEditor(admin): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response> {
    moderate(&state, &admin, id, ReviewStatus::Approved, "approved").await
}

/// Hide a review, keeping the row for the record.
#[instrument(skip(state, admin))]
pub async fn reject(
    RequireEditor(admin): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response> {
    moderate(&state, &admin, id, ReviewStatus::Rejected, "rejected").await
}

/// Remove a review outright.
#[instrument(skip(state, admin))]
pub async fn delete(
    RequireEditor(admin): RequireEditor,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response> {
    match ReviewRepository::new(state.pool())
        .delete(ReviewId::new(id))
        .await
    {
        Ok(()) => {
            tracing::info!(admin_id = admin.id.as_i32(), review_id = id, "Review deleted");
            Ok(Redirect::to("/reviews?notice=deleted").into_response())
        }
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/reviews?error=missing").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

async fn moderate(
    state: &AppState,
    admin: &crate::models::CurrentAdmin,
    id: i32,
    status: ReviewStatus,
    notice: &str,
) -> Result<Response> {
    match ReviewRepository::new(state.pool())
        .update_status(ReviewId::new(id), status)
        .await
    {
        Ok(review) => {
            tracing::info!(
                admin_id = admin.id.as_i32(),
                review_id = review.id.as_i32(),
                status = status.as_str(),
                "Review moderated"
            );
            Ok(Redirect::to(&format!("/reviews?notice={notice}")).into_response())
        }
        Err(RepositoryError::NotFound) => {
            Ok(Redirect::to("/reviews?error=missing").into_response())
        }
        Err(e) => Err(e.into()),
    }
}
