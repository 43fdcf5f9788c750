//! Handler for `GET /health`.

use std::sync::Arc;

use axum::{Json, extract::State};
use censo_core::store::CensoStore;
use chrono::Utc;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
  pub status:    &'static str,
  pub timestamp: String,
  pub database:  &'static str,
}

/// `GET /health` — round-trips the store before reporting OK.
pub async fn handler<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<HealthResponse>, ApiError>
where
  S: CensoStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .ping()
    .await
    .map_err(|e| ApiError::store("health", e))?;

  Ok(Json(HealthResponse {
    status:    "OK",
    timestamp: Utc::now().to_rfc3339(),
    database:  "SQLite connected",
  }))
}
