//! intake-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus environment
//! variables, opens the SQLite store, and serves the JSON API under `/api`.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use intake_mail::SmtpMailer;
use intake_server::{ServerConfig, StoreLocation, build_app};
use intake_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Contact intake API server")]
struct Cli {
  /// Path to the TOML configuration file. Optional; environment variables
  /// take precedence over it.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store = match server_cfg.store_location() {
    StoreLocation::Memory => {
      tracing::warn!("using an in-memory database; records are lost on exit");
      SqliteStore::open_in_memory()
        .await
        .context("failed to open in-memory store")?
    }
    StoreLocation::File(path) => SqliteStore::open(&path)
      .await
      .with_context(|| format!("failed to open store at {path:?}"))?,
  };

  let mailer = SmtpMailer::from_config(&server_cfg.mail())
    .context("failed to configure SMTP transport")?;

  let (app, notifier) = build_app(&server_cfg, Arc::new(store), mailer);

  let address = server_cfg.address();
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  // The router is gone, so the queue is closed; let pending notifications go out.
  notifier.await.context("notification worker panicked")?;
  tracing::info!("shut down cleanly");

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutdown signal received");
}
