//! Census record types — one row per municipal employee submission.
//!
//! A record is created once via the submission flow and never updated or
//! deleted through the public surface. `email` is the natural key; the
//! store enforces its uniqueness. All JSON representations are camelCase.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A persisted census submission, as returned by reads.
///
/// `id` and both timestamps are assigned by the store; everything else is
/// client-provided. `fecha_actualizacion` is refreshed by the store on any
/// row mutation and is always `>= fecha_registro`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CensoRecord {
  pub id:                  i64,
  pub email:               String,
  pub apellido_nombre:     String,
  pub tipo_documento:      String,
  pub cuil:                String,
  pub fecha_nacimiento:    Option<NaiveDate>,
  pub edad:                Option<i64>,
  pub sexo:                Option<String>,
  pub estado_civil:        Option<String>,
  pub telefono:            Option<String>,
  pub domicilio_real:      Option<String>,
  pub barrio:              Option<String>,
  pub traslado:            Option<String>,
  pub condicion_vivienda:  Option<String>,
  pub beneficiarios:       Option<String>,
  pub domicilio_laboral:   Option<String>,
  pub modalidad:           Option<String>,
  pub interno:             Option<String>,
  pub legajo:              Option<String>,
  pub cupo_ley:            Option<String>,
  pub adscripto:           Option<String>,
  pub lugar_adscripcion:   Option<String>,
  pub secretaria:          Option<String>,
  pub subsecretaria:       Option<String>,
  pub direccion_general:   Option<String>,
  pub nivel_jerarquico:    Option<String>,
  pub direccion:           Option<String>,
  pub departamento:        Option<String>,
  pub division:            Option<String>,
  pub profesional_adjunto: Option<String>,
  pub otro_cargo:          Option<String>,
  pub fecha_registro:      DateTime<Utc>,
  pub fecha_actualizacion: DateTime<Utc>,
}

/// A submission payload, before the store assigns `id` and timestamps.
///
/// The four required fields default to the empty string when absent so a
/// sparse payload deserialises cleanly and fails presence validation with a
/// domain error instead of a serde rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewCenso {
  pub email:               String,
  pub apellido_nombre:     String,
  pub tipo_documento:      String,
  pub cuil:                String,
  pub fecha_nacimiento:    Option<NaiveDate>,
  pub edad:                Option<i64>,
  pub sexo:                Option<String>,
  pub estado_civil:        Option<String>,
  pub telefono:            Option<String>,
  pub domicilio_real:      Option<String>,
  pub barrio:              Option<String>,
  pub traslado:            Option<String>,
  pub condicion_vivienda:  Option<String>,
  pub beneficiarios:       Option<String>,
  pub domicilio_laboral:   Option<String>,
  pub modalidad:           Option<String>,
  pub interno:             Option<String>,
  pub legajo:              Option<String>,
  pub cupo_ley:            Option<String>,
  pub adscripto:           Option<String>,
  pub lugar_adscripcion:   Option<String>,
  pub secretaria:          Option<String>,
  pub subsecretaria:       Option<String>,
  pub direccion_general:   Option<String>,
  pub nivel_jerarquico:    Option<String>,
  pub direccion:           Option<String>,
  pub departamento:        Option<String>,
  pub division:            Option<String>,
  pub profesional_adjunto: Option<String>,
  pub otro_cargo:          Option<String>,
}

impl NewCenso {
  /// Names (camelCase, as they appear on the wire) of required fields that
  /// are absent or blank in this payload.
  ///
  /// Presence is the only check performed. Email shape, CUIL checksums and
  /// date plausibility are deliberately not validated here.
  pub fn missing_required_fields(&self) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if self.email.trim().is_empty() {
      missing.push("email");
    }
    if self.apellido_nombre.trim().is_empty() {
      missing.push("apellidoNombre");
    }
    if self.tipo_documento.trim().is_empty() {
      missing.push("tipoDocumento");
    }
    if self.cuil.trim().is_empty() {
      missing.push("cuil");
    }
    missing
  }

  /// Presence validation for the required fields.
  pub fn validate(&self) -> Result<()> {
    let missing = self.missing_required_fields();
    if missing.is_empty() {
      Ok(())
    } else {
      Err(Error::MissingFields(missing))
    }
  }
}
