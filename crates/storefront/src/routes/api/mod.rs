//! JSON API routes.
//!
//! Read endpoints expose the catalog to mobile clients and widgets; the one
//! write endpoint accepts quick orders. The whole group is mounted with
//! permissive CORS and an IP rate limit.

pub mod categories;
pub mod filters;
pub mod locations;
pub mod products;
pub mod quick_orders;
pub mod reviews;

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
