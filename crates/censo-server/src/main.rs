//! censo-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the
//! SQLite store — which runs schema initialisation — and serves the census
//! API over HTTP.
//!
//! # Schema setup
//!
//! `--setup` initialises the schema, logs the resulting table layout and
//! index list for operator verification, and exits. Any failure aborts with
//! a non-zero status; the application cannot run without its table.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use censo_core::store::CensoStore as _;
use censo_server::{ServerConfig, app};
use censo_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Municipal census API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Initialise the database schema, report the result, and exit.
  #[arg(long)]
  setup: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("CENSO"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Opening the store runs schema initialisation; failure here is fatal.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.store_path)
    })?;

  if cli.setup {
    return report_schema(&store).await;
  }

  let router = app(Arc::new(store), &server_cfg)
    .context("invalid frontend_url in configuration")?;

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  tracing::info!("API disponible en http://{address}/api");

  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, router)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

/// Log the table layout and index list so an operator can verify the setup.
async fn report_schema(store: &SqliteStore) -> anyhow::Result<()> {
  let report = store
    .schema_report()
    .await
    .context("failed to read back schema")?;

  tracing::info!("tabla censo_municipal:");
  for column in &report.columns {
    tracing::info!(
      "  {:<22} {:<8} {}",
      column.name,
      column.data_type,
      if column.not_null { "NOT NULL" } else { "NULL" },
    );
  }

  tracing::info!("índices:");
  for index in &report.indexes {
    tracing::info!("  {index}");
  }

  Ok(())
}

/// Resolve when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
  let ctrl_c = async {
    tokio::signal::ctrl_c()
      .await
      .expect("failed to install Ctrl+C handler");
  };

  #[cfg(unix)]
  let terminate = async {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
      .expect("failed to install SIGTERM handler")
      .recv()
      .await;
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {},
    () = terminate => {},
  }

  tracing::info!("shutdown signal received, stopping server");
}
