//! Handler for `GET /stats`.

use std::sync::Arc;

use axum::{Json, extract::State};
use censo_core::{stats::CensusStats, store::CensoStore};
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct StatsResponse {
  pub success: bool,
  pub stats:   CensusStats,
}

/// `GET /stats` — the three aggregate queries run concurrently and are
/// combined into one payload.
pub async fn handler<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<StatsResponse>, ApiError>
where
  S: CensoStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let (total, por_sexo, por_modalidad) = tokio::try_join!(
    store.count_all(),
    store.count_by_sexo(),
    store.count_by_modalidad(),
  )
  .map_err(|e| ApiError::store("stats", e))?;

  Ok(Json(StatsResponse {
    success: true,
    stats:   CensusStats { total, por_sexo, por_modalidad },
  }))
}
