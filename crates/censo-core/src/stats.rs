//! Aggregate statistics over the census table.
//!
//! Group keys come back exactly as stored: a NULL `sexo` or `modalidad` is
//! its own bucket (serialised as JSON `null`), never merged with the rest.

use serde::{Deserialize, Serialize};

/// One `GROUP BY sexo` bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SexoCount {
  pub sexo:     Option<String>,
  pub cantidad: i64,
}

/// One `GROUP BY modalidad` bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalidadCount {
  pub modalidad: Option<String>,
  pub cantidad:  i64,
}

/// The combined result of the three aggregate queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CensusStats {
  pub total:         i64,
  pub por_sexo:      Vec<SexoCount>,
  pub por_modalidad: Vec<ModalidadCount>,
}
