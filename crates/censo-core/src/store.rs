//! The `CensoStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `censo-store-sqlite`).
//! Higher layers (`censo-api`, `censo-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  record::{CensoRecord, NewCenso},
  stats::{ModalidadCount, SexoCount},
};

// ─── Schema report ───────────────────────────────────────────────────────────

/// One column of the census table, as reported by the backend.
#[derive(Debug, Clone)]
pub struct ColumnInfo {
  pub name:      String,
  pub data_type: String,
  pub not_null:  bool,
}

/// Snapshot of the table layout and its indexes, produced after schema
/// initialisation so an operator can verify the setup.
#[derive(Debug, Clone)]
pub struct SchemaReport {
  pub columns: Vec<ColumnInfo>,
  pub indexes: Vec<String>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a census store backend.
///
/// Records are insert-only: no update or delete operation exists in the
/// public surface. The backend owns `id` assignment and both timestamps,
/// and enforces `email` uniqueness as the authoritative conflict signal.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CensoStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Whether `err` is this backend's duplicate-email signal, i.e. the
  /// uniqueness-constraint rejection surfaced by [`CensoStore::insert_censo`].
  /// Handlers map it to a conflict response instead of a server error.
  fn is_duplicate_email(err: &Self::Error) -> bool;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new submission and return the stored record, with `id`,
  /// `fecha_registro` and `fecha_actualizacion` assigned by the store.
  ///
  /// A UNIQUE violation on `email` must surface as a typed duplicate-email
  /// error; callers map it to a conflict response.
  fn insert_censo(
    &self,
    input: NewCenso,
  ) -> impl Future<Output = Result<CensoRecord, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Advisory duplicate pre-check: the `id` already registered for `email`,
  /// if any. The UNIQUE constraint on insert remains the real enforcement.
  fn find_id_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + 'a;

  /// Every record, newest first (`fecha_registro` descending).
  /// Unbounded by design; pagination is out of the baseline contract.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<CensoRecord>, Self::Error>> + Send + '_;

  // ── Aggregates ────────────────────────────────────────────────────────

  fn count_all(
    &self,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  fn count_by_sexo(
    &self,
  ) -> impl Future<Output = Result<Vec<SexoCount>, Self::Error>> + Send + '_;

  fn count_by_modalidad(
    &self,
  ) -> impl Future<Output = Result<Vec<ModalidadCount>, Self::Error>> + Send + '_;

  // ── Operational ───────────────────────────────────────────────────────

  /// Trivial round-trip query; used by the health endpoint.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Column and index listing for the setup-mode operator printout.
  fn schema_report(
    &self,
  ) -> impl Future<Output = Result<SchemaReport, Self::Error>> + Send + '_;
}
