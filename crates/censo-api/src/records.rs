//! Handler for `GET /census-data` — the admin listing.

use std::sync::Arc;

use axum::{Json, extract::State};
use censo_core::{record::CensoRecord, store::CensoStore};
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct CensusDataResponse {
  pub success: bool,
  pub data:    Vec<CensoRecord>,
  pub total:   usize,
}

/// `GET /census-data` — every record, newest first. No pagination; the
/// unbounded response is part of the baseline contract.
pub async fn handler<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<CensusDataResponse>, ApiError>
where
  S: CensoStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let data = store
    .list_all()
    .await
    .map_err(|e| ApiError::store("census-data", e))?;

  let total = data.len();
  Ok(Json(CensusDataResponse { success: true, data, total }))
}
