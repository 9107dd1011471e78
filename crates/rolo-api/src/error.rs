//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rolo_core::error::{Classify, FailureKind};
use serde_json::json;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("invalid input: {0}")]
  Invalid(#[source] BoxError),

  #[error("store unavailable: {0}")]
  Unavailable(#[source] BoxError),

  #[error("store error: {0}")]
  Store(#[source] BoxError),
}

impl ApiError {
  /// Wrap a store failure according to its [`FailureKind`].
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Classify + Send + Sync + 'static,
  {
    match e.failure_kind() {
      FailureKind::Invalid => ApiError::Invalid(Box::new(e)),
      FailureKind::Transient => ApiError::Unavailable(Box::new(e)),
      FailureKind::Permanent => ApiError::Store(Box::new(e)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Invalid(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
      ApiError::Unavailable(e) => {
        tracing::warn!(error = %e, "store unavailable");
        (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
