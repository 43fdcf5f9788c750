//! HTTP server assembly for the municipal census service.
//!
//! Composes the JSON API router with the middleware stack — CORS restricted
//! to the configured frontend origin, request tracing, and a 10 MiB body
//! limit — and defines the runtime configuration type.

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  http::{HeaderValue, Method, header},
};
use censo_core::store::CensoStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` merged with
/// `CENSO_`-prefixed environment variables. Every field has a development
/// default so the server runs with no configuration at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub store_path:   PathBuf,
  /// Origin allowed by CORS — the public form and admin panel frontend.
  pub frontend_url: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:         "127.0.0.1".to_string(),
      port:         3001,
      store_path:   PathBuf::from("censo.db"),
      frontend_url: "http://localhost:3000".to_string(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Submission payloads stay well under this cap.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the full application router: the `/api` surface plus middleware.
///
/// Fails only if `config.frontend_url` is not a valid header value.
pub fn app<S>(
  store: Arc<S>,
  config: &ServerConfig,
) -> Result<Router, axum::http::header::InvalidHeaderValue>
where
  S: CensoStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let origin: HeaderValue = config.frontend_url.parse()?;
  let cors = CorsLayer::new()
    .allow_origin(origin)
    .allow_methods([Method::GET, Method::POST])
    .allow_headers([header::CONTENT_TYPE])
    .allow_credentials(true);

  Ok(
    Router::new()
      .nest("/api", censo_api::api_router(store))
      .layer(TraceLayer::new_for_http())
      .layer(cors)
      .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
  )
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use censo_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    app(Arc::new(store), &ServerConfig::default()).unwrap()
  }

  async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    router
      .clone()
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap()
  }

  async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn valid_payload() -> Value {
    json!({
      "email": "a@x.com",
      "apellidoNombre": "PEREZ JUAN",
      "tipoDocumento": "DNI",
      "cuil": "20-12345678-9",
    })
  }

  // ── Health ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_reports_ok() {
    let router = make_app().await;
    let resp = send(&router, "GET", "/api/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
    assert!(body["database"].as_str().unwrap().contains("connected"));
  }

  // ── Submission ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn submit_then_duplicate_then_stats() {
    let router = make_app().await;

    let resp =
      send(&router, "POST", "/api/submit-censo", Some(valid_payload())).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert!(body["id"].as_i64().unwrap() > 0);

    // Same payload again: conflict, no second row.
    let resp =
      send(&router, "POST", "/api/submit-censo", Some(valid_payload())).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "Email ya registrado");

    let resp = send(&router, "GET", "/api/stats", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert!(body["stats"]["total"].as_i64().unwrap() >= 1);
  }

  #[tokio::test]
  async fn submit_missing_fields_is_rejected() {
    let router = make_app().await;

    let resp = send(
      &router,
      "POST",
      "/api/submit-censo",
      Some(json!({ "email": "a@x.com" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "Faltan campos obligatorios");

    // Nothing was persisted.
    let resp = send(&router, "GET", "/api/census-data", None).await;
    let body = json_body(resp).await;
    assert_eq!(body["total"], 0);
  }

  #[tokio::test]
  async fn submit_blank_required_field_is_rejected() {
    let router = make_app().await;

    let mut payload = valid_payload();
    payload["cuil"] = json!("   ");
    let resp = send(&router, "POST", "/api/submit-censo", Some(payload)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Listing ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn census_data_round_trips_submission() {
    let router = make_app().await;

    let mut payload = valid_payload();
    payload["sexo"] = json!("Masculino");
    payload["fechaNacimiento"] = json!("1990-05-17");
    payload["edad"] = json!(35);
    send(&router, "POST", "/api/submit-censo", Some(payload)).await;

    let resp = send(&router, "GET", "/api/census-data", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 1);

    let record = &body["data"][0];
    assert_eq!(record["email"], "a@x.com");
    assert_eq!(record["apellidoNombre"], "PEREZ JUAN");
    assert_eq!(record["sexo"], "Masculino");
    assert_eq!(record["fechaNacimiento"], "1990-05-17");
    assert_eq!(record["edad"], 35);
    assert!(record["fechaRegistro"].is_string());
  }

  #[tokio::test]
  async fn census_data_is_newest_first() {
    let router = make_app().await;

    for email in ["a@x.com", "b@x.com", "c@x.com"] {
      let mut payload = valid_payload();
      payload["email"] = json!(email);
      send(&router, "POST", "/api/submit-censo", Some(payload)).await;
    }

    let body =
      json_body(send(&router, "GET", "/api/census-data", None).await).await;
    let emails: Vec<_> = body["data"]
      .as_array()
      .unwrap()
      .iter()
      .map(|r| r["email"].as_str().unwrap().to_string())
      .collect();
    assert_eq!(emails, vec!["c@x.com", "b@x.com", "a@x.com"]);
  }

  // ── Stats ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn stats_buckets_sum_to_total() {
    let router = make_app().await;

    for (email, sexo) in [
      ("a@x.com", Some("Femenino")),
      ("b@x.com", Some("Masculino")),
      ("c@x.com", None),
    ] {
      let mut payload = valid_payload();
      payload["email"] = json!(email);
      if let Some(sexo) = sexo {
        payload["sexo"] = json!(sexo);
      }
      send(&router, "POST", "/api/submit-censo", Some(payload)).await;
    }

    let body = json_body(send(&router, "GET", "/api/stats", None).await).await;
    let stats = &body["stats"];
    assert_eq!(stats["total"], 3);

    let por_sexo = stats["porSexo"].as_array().unwrap();
    let sum: i64 =
      por_sexo.iter().map(|b| b["cantidad"].as_i64().unwrap()).sum();
    assert_eq!(sum, 3);
    // The unset bucket is present, not folded into the others.
    assert!(por_sexo.iter().any(|b| b["sexo"].is_null()));

    let por_modalidad = stats["porModalidad"].as_array().unwrap();
    let sum: i64 = por_modalidad
      .iter()
      .map(|b| b["cantidad"].as_i64().unwrap())
      .sum();
    assert_eq!(sum, 3);
  }

  // ── Export ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn export_empty_store_is_404() {
    let router = make_app().await;
    let resp = send(&router, "GET", "/api/export-csv", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = json_body(resp).await;
    assert_eq!(body["error"], "No hay datos para exportar");
  }

  #[tokio::test]
  async fn export_returns_csv_attachment() {
    let router = make_app().await;
    send(&router, "POST", "/api/submit-censo", Some(valid_payload())).await;

    let resp = send(&router, "GET", "/api/export-csv", None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp
      .headers()
      .get(header::CONTENT_TYPE)
      .unwrap()
      .to_str()
      .unwrap();
    assert!(content_type.contains("text/csv"), "Content-Type: {content_type}");

    let disposition = resp
      .headers()
      .get(header::CONTENT_DISPOSITION)
      .unwrap()
      .to_str()
      .unwrap();
    assert!(
      disposition.contains("censo_municipal_"),
      "Content-Disposition: {disposition}"
    );

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let text = std::str::from_utf8(&bytes).unwrap();
    let lines: Vec<_> = text.trim_end().lines().collect();
    assert_eq!(lines.len(), 2); // header + one record
    assert!(lines[0].starts_with("ID,Email,Apellido y Nombre,"));
    assert!(lines[1].contains("a@x.com"));
  }
}
