//! Handler for `GET /export-csv`.
//!
//! Materialises the full result set (same ordering as the listing), then
//! serialises every record under the fixed header below and streams the
//! file back as an attachment. The whole export lives in memory, which
//! bounds scalability to available memory — accepted baseline behaviour.

use std::sync::Arc;

use axum::{
  body::Body,
  extract::State,
  http::{StatusCode, header},
  response::Response,
};
use censo_core::{record::CensoRecord, store::CensoStore};
use chrono::Utc;

use crate::error::ApiError;

/// Export header row, one title per stored column except
/// `fecha_actualizacion` (an internal bookkeeping field).
pub const CSV_HEADER: [&str; 32] = [
  "ID",
  "Email",
  "Apellido y Nombre",
  "Tipo Documento",
  "CUIL",
  "Fecha Nacimiento",
  "Edad",
  "Sexo",
  "Estado Civil",
  "Teléfono",
  "Domicilio Real",
  "Barrio",
  "Traslado",
  "Condición Vivienda",
  "Beneficiarios",
  "Domicilio Laboral",
  "Modalidad",
  "Interno",
  "Legajo",
  "Cupo Ley",
  "Adscripto",
  "Lugar Adscripción",
  "Secretaría",
  "Subsecretaría",
  "Dirección General",
  "Nivel Jerárquico",
  "Dirección",
  "Departamento",
  "División",
  "Profesional Adjunto",
  "Otro Cargo",
  "Fecha Registro",
];

fn csv_row(r: &CensoRecord) -> Vec<String> {
  let opt = |v: &Option<String>| v.clone().unwrap_or_default();
  vec![
    r.id.to_string(),
    r.email.clone(),
    r.apellido_nombre.clone(),
    r.tipo_documento.clone(),
    r.cuil.clone(),
    r.fecha_nacimiento.map(|d| d.to_string()).unwrap_or_default(),
    r.edad.map(|e| e.to_string()).unwrap_or_default(),
    opt(&r.sexo),
    opt(&r.estado_civil),
    opt(&r.telefono),
    opt(&r.domicilio_real),
    opt(&r.barrio),
    opt(&r.traslado),
    opt(&r.condicion_vivienda),
    opt(&r.beneficiarios),
    opt(&r.domicilio_laboral),
    opt(&r.modalidad),
    opt(&r.interno),
    opt(&r.legajo),
    opt(&r.cupo_ley),
    opt(&r.adscripto),
    opt(&r.lugar_adscripcion),
    opt(&r.secretaria),
    opt(&r.subsecretaria),
    opt(&r.direccion_general),
    opt(&r.nivel_jerarquico),
    opt(&r.direccion),
    opt(&r.departamento),
    opt(&r.division),
    opt(&r.profesional_adjunto),
    opt(&r.otro_cargo),
    r.fecha_registro.to_rfc3339(),
  ]
}

/// Serialise `records` to CSV bytes under [`CSV_HEADER`].
pub fn to_csv(records: &[CensoRecord]) -> csv::Result<Vec<u8>> {
  let mut wtr = csv::Writer::from_writer(Vec::new());
  wtr.write_record(CSV_HEADER)?;
  for record in records {
    wtr.write_record(csv_row(record))?;
  }
  wtr.into_inner().map_err(|e| e.into_error().into())
}

/// `GET /export-csv` — 404 when the store is empty (no file is produced).
pub async fn handler<S>(
  State(store): State<Arc<S>>,
) -> Result<Response, ApiError>
where
  S: CensoStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let records = store
    .list_all()
    .await
    .map_err(|e| ApiError::store("export-csv", e))?;

  if records.is_empty() {
    return Err(ApiError::NotFound("No hay datos para exportar".into()));
  }

  let bytes = to_csv(&records).map_err(|e| ApiError::store("export-csv", e))?;
  let filename =
    format!("censo_municipal_{}.csv", Utc::now().format("%Y-%m-%d"));

  tracing::info!(rows = records.len(), %filename, "censo exportado a CSV");

  Ok(
    Response::builder()
      .status(StatusCode::OK)
      .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
      .header(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{filename}\""),
      )
      .header(header::CONTENT_LENGTH, bytes.len())
      .body(Body::from(bytes))
      .unwrap(),
  )
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, TimeZone, Utc};

  use super::*;

  fn record(id: i64, email: &str) -> CensoRecord {
    let at = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
    CensoRecord {
      id,
      email:               email.into(),
      apellido_nombre:     "PEREZ JUAN".into(),
      tipo_documento:      "DNI".into(),
      cuil:                "20-12345678-9".into(),
      fecha_nacimiento:    NaiveDate::from_ymd_opt(1990, 5, 17),
      edad:                Some(35),
      sexo:                Some("Masculino".into()),
      estado_civil:        None,
      telefono:            None,
      domicilio_real:      None,
      barrio:              None,
      traslado:            None,
      condicion_vivienda:  None,
      beneficiarios:       None,
      domicilio_laboral:   None,
      modalidad:           Some("Presencial".into()),
      interno:             None,
      legajo:              None,
      cupo_ley:            None,
      adscripto:           None,
      lugar_adscripcion:   None,
      secretaria:          None,
      subsecretaria:       None,
      direccion_general:   None,
      nivel_jerarquico:    None,
      direccion:           None,
      departamento:        None,
      division:            None,
      profesional_adjunto: None,
      otro_cargo:          None,
      fecha_registro:      at,
      fecha_actualizacion: at,
    }
  }

  #[test]
  fn header_row_is_fixed_and_complete() {
    let bytes = to_csv(&[]).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let header: Vec<_> = text.trim_end().split(',').collect();
    assert_eq!(header.len(), 32);
    assert_eq!(header[0], "ID");
    assert_eq!(header[2], "Apellido y Nombre");
    assert_eq!(header[31], "Fecha Registro");
  }

  #[test]
  fn one_data_row_per_record_in_order() {
    let bytes = to_csv(&[record(2, "b@x.com"), record(1, "a@x.com")]).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<_> = text.trim_end().lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("2,b@x.com,PEREZ JUAN,DNI,"));
    assert!(lines[2].starts_with("1,a@x.com,"));
  }

  #[test]
  fn optional_fields_serialise_as_empty_cells() {
    let bytes = to_csv(&[record(1, "a@x.com")]).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let row: Vec<_> = text.lines().nth(1).unwrap().split(',').collect();
    assert_eq!(row.len(), 32);
    assert_eq!(row[5], "1990-05-17");
    assert_eq!(row[6], "35");
    assert_eq!(row[8], ""); // estado civil unset
    assert_eq!(row[16], "Presencial");
  }
}
