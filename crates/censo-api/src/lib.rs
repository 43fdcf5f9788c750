//! JSON REST API for the municipal census service.
//!
//! Exposes an axum [`Router`] backed by any [`censo_core::store::CensoStore`].
//! CORS, body limits, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", censo_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod export;
pub mod health;
pub mod records;
pub mod stats;
pub mod submit;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use censo_core::store::CensoStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CensoStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/health", get(health::handler::<S>))
    .route("/submit-censo", post(submit::handler::<S>))
    .route("/census-data", get(records::handler::<S>))
    .route("/export-csv", get(export::handler::<S>))
    .route("/stats", get(stats::handler::<S>))
    .with_state(store)
}
