//! [`SqliteStore`] — the SQLite implementation of [`CensoStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use censo_core::{
  record::{CensoRecord, NewCenso},
  stats::{ModalidadCount, SexoCount},
  store::{CensoStore, ColumnInfo, SchemaReport},
};

use crate::{
  encode::{encode_date, encode_dt, RawCensoRecord, SELECT_COLUMNS},
  schema::SCHEMA,
  Error, Result,
};

/// Whether `err` is SQLite's UNIQUE-constraint rejection. The `email`
/// uniqueness constraint is the only UNIQUE constraint in the schema, so
/// this is the authoritative duplicate-submission signal.
fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A census store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every
/// query runs as a scoped closure on the connection's dedicated thread, so
/// the connection is acquired and released on every path, including errors.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Create the table, indexes and update trigger. Safe to run any number
  /// of times.
  pub(crate) async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Raw access for tests that need to mutate rows outside the public
  /// surface (the census API itself exposes no update operation).
  #[cfg(test)]
  pub(crate) async fn raw_execute(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(sql, [])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CensoStore impl ─────────────────────────────────────────────────────────

impl CensoStore for SqliteStore {
  type Error = Error;

  fn is_duplicate_email(err: &Error) -> bool {
    matches!(err, Error::DuplicateEmail(_))
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert_censo(&self, input: NewCenso) -> Result<CensoRecord> {
    let now = Utc::now();
    let mut record = CensoRecord {
      id:                  0, // assigned below
      email:               input.email,
      apellido_nombre:     input.apellido_nombre,
      tipo_documento:      input.tipo_documento,
      cuil:                input.cuil,
      fecha_nacimiento:    input.fecha_nacimiento,
      edad:                input.edad,
      sexo:                input.sexo,
      estado_civil:        input.estado_civil,
      telefono:            input.telefono,
      domicilio_real:      input.domicilio_real,
      barrio:              input.barrio,
      traslado:            input.traslado,
      condicion_vivienda:  input.condicion_vivienda,
      beneficiarios:       input.beneficiarios,
      domicilio_laboral:   input.domicilio_laboral,
      modalidad:           input.modalidad,
      interno:             input.interno,
      legajo:              input.legajo,
      cupo_ley:            input.cupo_ley,
      adscripto:           input.adscripto,
      lugar_adscripcion:   input.lugar_adscripcion,
      secretaria:          input.secretaria,
      subsecretaria:       input.subsecretaria,
      direccion_general:   input.direccion_general,
      nivel_jerarquico:    input.nivel_jerarquico,
      direccion:           input.direccion,
      departamento:        input.departamento,
      division:            input.division,
      profesional_adjunto: input.profesional_adjunto,
      otro_cargo:          input.otro_cargo,
      fecha_registro:      now,
      fecha_actualizacion: now,
    };

    let row = record.clone();
    let nacimiento_str = row.fecha_nacimiento.map(encode_date);
    let at_str = encode_dt(now);

    let inserted = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO censo_municipal (
             email, apellido_nombre, tipo_documento, cuil, fecha_nacimiento,
             edad, sexo, estado_civil, telefono, domicilio_real, barrio,
             traslado, condicion_vivienda, beneficiarios, domicilio_laboral,
             modalidad, interno, legajo, cupo_ley, adscripto,
             lugar_adscripcion, secretaria, subsecretaria, direccion_general,
             nivel_jerarquico, direccion, departamento, division,
             profesional_adjunto, otro_cargo, fecha_registro,
             fecha_actualizacion
           ) VALUES (
             ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
             ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26,
             ?27, ?28, ?29, ?30, ?31, ?32
           )",
          rusqlite::params![
            row.email,
            row.apellido_nombre,
            row.tipo_documento,
            row.cuil,
            nacimiento_str,
            row.edad,
            row.sexo,
            row.estado_civil,
            row.telefono,
            row.domicilio_real,
            row.barrio,
            row.traslado,
            row.condicion_vivienda,
            row.beneficiarios,
            row.domicilio_laboral,
            row.modalidad,
            row.interno,
            row.legajo,
            row.cupo_ley,
            row.adscripto,
            row.lugar_adscripcion,
            row.secretaria,
            row.subsecretaria,
            row.direccion_general,
            row.nivel_jerarquico,
            row.direccion,
            row.departamento,
            row.division,
            row.profesional_adjunto,
            row.otro_cargo,
            at_str,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await;

    record.id = match inserted {
      Ok(id) => id,
      Err(e) if is_unique_violation(&e) => {
        return Err(Error::DuplicateEmail(record.email));
      }
      Err(e) => return Err(e.into()),
    };

    Ok(record)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn find_id_by_email(&self, email: &str) -> Result<Option<i64>> {
    let email = email.to_owned();
    let id = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id FROM censo_municipal WHERE email = ?1",
              rusqlite::params![email],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(id)
  }

  async fn list_all(&self) -> Result<Vec<CensoRecord>> {
    let raws: Vec<RawCensoRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SELECT_COLUMNS} FROM censo_municipal
           ORDER BY fecha_registro DESC"
        ))?;
        let rows = stmt
          .query_map([], RawCensoRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCensoRecord::into_record).collect()
  }

  // ── Aggregates ────────────────────────────────────────────────────────────

  async fn count_all(&self) -> Result<i64> {
    let total = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM censo_municipal",
          [],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(total)
  }

  async fn count_by_sexo(&self) -> Result<Vec<SexoCount>> {
    let buckets = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT sexo, COUNT(*) FROM censo_municipal GROUP BY sexo",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(SexoCount { sexo: row.get(0)?, cantidad: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(buckets)
  }

  async fn count_by_modalidad(&self) -> Result<Vec<ModalidadCount>> {
    let buckets = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT modalidad, COUNT(*) FROM censo_municipal GROUP BY modalidad",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(ModalidadCount {
              modalidad: row.get(0)?,
              cantidad:  row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(buckets)
  }

  // ── Operational ───────────────────────────────────────────────────────────

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn schema_report(&self) -> Result<SchemaReport> {
    let report = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("PRAGMA table_info(censo_municipal)")?;
        let columns = stmt
          .query_map([], |row| {
            Ok(ColumnInfo {
              name:      row.get(1)?,
              data_type: row.get(2)?,
              not_null:  row.get::<_, i64>(3)? != 0,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare("PRAGMA index_list(censo_municipal)")?;
        let indexes = stmt
          .query_map([], |row| row.get::<_, String>(1))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(SchemaReport { columns, indexes })
      })
      .await?;
    Ok(report)
  }
}
