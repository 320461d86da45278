//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  Unprocessable(String),

  #[error("{0}")]
  RateLimited(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The body could not be read as the expected JSON shape.
  #[error(transparent)]
  Body(#[from] JsonRejection),
}

impl From<intake_core::Error> for ApiError {
  fn from(e: intake_core::Error) -> Self {
    match e {
      intake_core::Error::MissingField(_) => ApiError::Unprocessable(e.to_string()),
      intake_core::Error::RateLimited => ApiError::RateLimited(e.to_string()),
      intake_core::Error::Store(inner) => ApiError::Store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::RateLimited(m) => (StatusCode::TOO_MANY_REQUESTS, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
      ApiError::Body(r) => (r.status(), r.body_text()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
