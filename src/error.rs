//! Service error taxonomy.
//!
//! The service and proxy layers never let a raw storage or transport error
//! escape — every failure is classified into one of these variants before it
//! crosses the HTTP boundary. Upstream and persistence causes are logged
//! server-side; the client only sees the generic display message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Bad or empty input → 400.
    #[error("{0}")]
    Validation(String),

    /// Unknown task id or checklist name → 404.
    #[error("{0}")]
    NotFound(String),

    /// Missing admin credentials, or no remote token configured → 401.
    #[error("{0}")]
    Unauthorized(String),

    /// Remote checklist service unreachable, non-200, or malformed body → 500.
    /// The cause never reaches the client; it is logged when rendered.
    #[error("checklist service unavailable")]
    Upstream(anyhow::Error),

    /// Store write failed → 500.
    #[error("storage failure")]
    Persistence(anyhow::Error),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Upstream(_) | Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match &self {
            Self::Upstream(cause) => error!("checklist service error: {cause:#}"),
            Self::Persistence(cause) => error!("storage error: {cause:#}"),
            _ => {}
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
