//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Client-facing bodies are `{"error": <title>, "message": <text>}`, with
//! Spanish wording matching the rest of the user-facing surface. Store
//! failures are logged with their operation context and collapse to a
//! generic 500 — no query text or source-error detail ever reaches the
//! caller.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Required submission fields are absent or blank.
  #[error("validation failed: {0}")]
  Validation(String),

  /// The natural key (email) is already registered.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a backend failure as a 500, logging it with operation context.
  pub fn store<E>(operation: &'static str, err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    tracing::error!(operation, error = %err, "store operation failed");
    ApiError::Store(Box::new(err))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Validation(message) => (
        StatusCode::BAD_REQUEST,
        Json(json!({
          "error": "Faltan campos obligatorios",
          "message": message,
        })),
      )
        .into_response(),
      ApiError::Conflict(message) => (
        StatusCode::CONFLICT,
        Json(json!({
          "error": "Email ya registrado",
          "message": message,
        })),
      )
        .into_response(),
      ApiError::NotFound(message) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": message })))
          .into_response()
      }
      ApiError::Store(_) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
          "error": "Error interno del servidor",
          "message": "Intente nuevamente más tarde.",
        })),
      )
        .into_response(),
    }
  }
}
