//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`.
//! Both sort lexicographically in chronological order, which is what the
//! `ORDER BY fecha_registro` queries rely on.

use chrono::{DateTime, NaiveDate, Utc};
use censo_core::record::CensoRecord;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw values read directly from a `censo_municipal` row, before date and
/// timestamp columns are parsed into their domain types.
pub struct RawCensoRecord {
  pub id:                  i64,
  pub email:               String,
  pub apellido_nombre:     String,
  pub tipo_documento:      String,
  pub cuil:                String,
  pub fecha_nacimiento:    Option<String>,
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
  pub fecha_registro:      String,
  pub fecha_actualizacion: String,
}

impl RawCensoRecord {
  /// Read one raw record from a row produced by [`SELECT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                  row.get(0)?,
      email:               row.get(1)?,
      apellido_nombre:     row.get(2)?,
      tipo_documento:      row.get(3)?,
      cuil:                row.get(4)?,
      fecha_nacimiento:    row.get(5)?,
      edad:                row.get(6)?,
      sexo:                row.get(7)?,
      estado_civil:        row.get(8)?,
      telefono:            row.get(9)?,
      domicilio_real:      row.get(10)?,
      barrio:              row.get(11)?,
      traslado:            row.get(12)?,
      condicion_vivienda:  row.get(13)?,
      beneficiarios:       row.get(14)?,
      domicilio_laboral:   row.get(15)?,
      modalidad:           row.get(16)?,
      interno:             row.get(17)?,
      legajo:              row.get(18)?,
      cupo_ley:            row.get(19)?,
      adscripto:           row.get(20)?,
      lugar_adscripcion:   row.get(21)?,
      secretaria:          row.get(22)?,
      subsecretaria:       row.get(23)?,
      direccion_general:   row.get(24)?,
      nivel_jerarquico:    row.get(25)?,
      direccion:           row.get(26)?,
      departamento:        row.get(27)?,
      division:            row.get(28)?,
      profesional_adjunto: row.get(29)?,
      otro_cargo:          row.get(30)?,
      fecha_registro:      row.get(31)?,
      fecha_actualizacion: row.get(32)?,
    })
  }

  pub fn into_record(self) -> Result<CensoRecord> {
    Ok(CensoRecord {
      id:                  self.id,
      email:               self.email,
      apellido_nombre:     self.apellido_nombre,
      tipo_documento:      self.tipo_documento,
      cuil:                self.cuil,
      fecha_nacimiento:    self
        .fecha_nacimiento
        .as_deref()
        .map(decode_date)
        .transpose()?,
      edad:                self.edad,
      sexo:                self.sexo,
      estado_civil:        self.estado_civil,
      telefono:            self.telefono,
      domicilio_real:      self.domicilio_real,
      barrio:              self.barrio,
      traslado:            self.traslado,
      condicion_vivienda:  self.condicion_vivienda,
      beneficiarios:       self.beneficiarios,
      domicilio_laboral:   self.domicilio_laboral,
      modalidad:           self.modalidad,
      interno:             self.interno,
      legajo:              self.legajo,
      cupo_ley:            self.cupo_ley,
      adscripto:           self.adscripto,
      lugar_adscripcion:   self.lugar_adscripcion,
      secretaria:          self.secretaria,
      subsecretaria:       self.subsecretaria,
      direccion_general:   self.direccion_general,
      nivel_jerarquico:    self.nivel_jerarquico,
      direccion:           self.direccion,
      departamento:        self.departamento,
      division:            self.division,
      profesional_adjunto: self.profesional_adjunto,
      otro_cargo:          self.otro_cargo,
      fecha_registro:      decode_dt(&self.fecha_registro)?,
      fecha_actualizacion: decode_dt(&self.fecha_actualizacion)?,
    })
  }
}

/// Column list shared by every read query, in [`RawCensoRecord::from_row`]
/// order.
pub const SELECT_COLUMNS: &str = "\
id, email, apellido_nombre, tipo_documento, cuil, fecha_nacimiento, edad, \
sexo, estado_civil, telefono, domicilio_real, barrio, traslado, \
condicion_vivienda, beneficiarios, domicilio_laboral, modalidad, interno, \
legajo, cupo_ley, adscripto, lugar_adscripcion, secretaria, subsecretaria, \
direccion_general, nivel_jerarquico, direccion, departamento, division, \
profesional_adjunto, otro_cargo, fecha_registro, fecha_actualizacion";
