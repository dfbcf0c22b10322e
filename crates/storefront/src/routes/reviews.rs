//! Review route handlers.
//!
//! Submitted reviews are born pending and only appear once an admin
//! approves them, so the page a customer lands back on says "thanks"
//! instead of showing their review.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use paws_core::ProductId;
use paws_core::models::Review;

use crate::db::ReviewRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::routes::BaseContext;
use crate::state::AppState;

/// Review display data for templates.
#[derive(Clone)]
pub struct ReviewView {
    pub author_name: String,
    pub rating: i32,
    pub body: String,
    pub date: String,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            author_name: review.author_name.clone(),
            rating: review.rating,
            body: review.body.clone(),
            date: review.created_at.format("%b %e, %Y").to_string(),
        }
    }
}

/// Review submission form data.
///
/// The rating arrives as a string and parses leniently; anything
/// unreadable counts as the top rating and is clamped on insert anyway.
#[derive(Debug, Deserialize)]
pub struct NewReviewForm {
    pub author_name: String,
    pub rating: Option<String>,
    pub body: String,
    pub product_id: Option<i32>,
    /// Slug of the product page the form was on, for the redirect back.
    pub product_slug: Option<String>,
}

/// Query parameters for post-redirect notices.
#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    pub review: Option<String>,
    pub error: Option<String>,
}

/// Reviews page template.
#[derive(Template, WebTemplate)]
#[template(path = "reviews/index.html")]
pub struct ReviewsIndexTemplate {
    pub base: BaseContext,
    pub reviews: Vec<ReviewView>,
    pub review_sent: bool,
    pub error: Option<String>,
}

/// Display all approved reviews with the submission form.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<ReviewsQuery>,
) -> Result<impl IntoResponse> {
    let reviews = ReviewRepository::new(state.pool()).list_approved(None).await?;

    Ok(ReviewsIndexTemplate {
        base: BaseContext::load(&state, user.as_ref()).await,
        reviews: reviews.iter().map(ReviewView::from).collect(),
        review_sent: query.review.as_deref() == Some("sent"),
        error: query
            .error
            .as_deref()
            .map(|_| "Please fill in your name and review text.".to_owned()),
    })
}

/// Submit a review for moderation and bounce back to the originating page.
#[instrument(skip(state, form))]
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<NewReviewForm>,
) -> Result<Response> {
    let back = form
        .product_slug
        .as_deref()
        .map_or_else(|| "/reviews".to_owned(), |slug| format!("/products/{slug}"));

    if form.author_name.trim().is_empty() || form.body.trim().is_empty() {
        return Ok(Redirect::to(&format!("{back}?error=review")).into_response());
    }

    let rating = form
        .rating
        .as_deref()
        .and_then(|r| r.parse::<i32>().ok())
        .unwrap_or(Review::MAX_RATING);

    let review = ReviewRepository::new(state.pool())
        .create_pending(
            form.product_id.map(ProductId::new),
            form.author_name.trim(),
            rating,
            form.body.trim(),
        )
        .await?;
    tracing::info!(review_id = review.id.as_i32(), "Review submitted for moderation");

    Ok(Redirect::to(&format!("{back}?review=sent")).into_response())
}
