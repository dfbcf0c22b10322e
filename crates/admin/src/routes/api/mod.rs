//! JSON API routes for the admin panel.
//!
//! Status updates on orders and quick orders are exposed as PATCH
//! endpoints so operator tooling can drive them without scraping forms.
//! Authentication is the same session cookie as the pages; unauthenticated
//! calls get status codes, not login redirects.

pub mod orders;
pub mod quick_orders;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Error response body for API endpoints.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip)]
    status: StatusCode,
}

impl ApiError {
    fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            status,
        }
    }

    fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg)
    }
}

impl From<crate::db::RepositoryError> for ApiError {
    fn from(e: crate::db::RepositoryError) -> Self {
        tracing::error!("API repository error: {e}");
        Self::internal("internal error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}
