//! Handler for `POST /submit-censo`.
//!
//! | Step | Outcome on failure |
//! |------|--------------------|
//! | Presence validation of the four required fields | 400 |
//! | Advisory duplicate pre-check by email | 409 |
//! | Insert (UNIQUE constraint is authoritative) | 409 on violation, 500 otherwise |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use censo_core::{record::NewCenso, store::CensoStore};
use serde::Serialize;

use crate::error::ApiError;

const REQUIRED_MESSAGE: &str =
  "Email, apellido y nombre, tipo de documento y CUIL son requeridos";
const CONFLICT_MESSAGE: &str =
  "Ya existe un registro con este email. Contacte al administrador para actualizar.";

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
  pub success: bool,
  pub message: &'static str,
  pub id:      i64,
}

/// `POST /submit-censo` — body: a camelCase census payload.
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Json(input): Json<NewCenso>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CensoStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let missing = input.missing_required_fields();
  if !missing.is_empty() {
    tracing::warn!(?missing, "submission rejected, missing required fields");
    return Err(ApiError::Validation(REQUIRED_MESSAGE.into()));
  }

  // Fast path for a friendlier message. Two concurrent submissions can both
  // pass this check; the UNIQUE constraint on the insert below is the real
  // enforcement.
  let existing = store
    .find_id_by_email(&input.email)
    .await
    .map_err(|e| ApiError::store("submit-censo", e))?;
  if existing.is_some() {
    return Err(ApiError::Conflict(CONFLICT_MESSAGE.into()));
  }

  let record = match store.insert_censo(input).await {
    Ok(record) => record,
    Err(e) if S::is_duplicate_email(&e) => {
      return Err(ApiError::Conflict(CONFLICT_MESSAGE.into()));
    }
    Err(e) => return Err(ApiError::store("submit-censo", e)),
  };

  tracing::info!(id = record.id, email = %record.email, "censo registrado");

  Ok((
    StatusCode::CREATED,
    Json(SubmitResponse {
      success: true,
      message: "Censo registrado exitosamente",
      id:      record.id,
    }),
  ))
}
