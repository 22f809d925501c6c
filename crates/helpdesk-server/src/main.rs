//! helpdesk server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered with
//! `HELPDESK_*` environment variables, opens the configured store, and serves
//! the JSON API under `/api`.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use helpdesk_core::store::TicketStore;
use helpdesk_server::{ServerConfig, StoreEndpoint};
use helpdesk_store_rest::{RestConfig, RestStore};
use helpdesk_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Helpdesk API server")]
struct Cli {
  /// Path to the TOML configuration file.
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

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("HELPDESK"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let address = server_cfg.address();

  match server_cfg.endpoint()? {
    StoreEndpoint::InMemory => {
      tracing::warn!("using an in-memory store; data is lost on exit");
      let store = SqliteStore::open_in_memory()
        .await
        .context("failed to open in-memory store")?;
      serve(store, &address).await
    }
    StoreEndpoint::Sqlite(path) => {
      let store = SqliteStore::open(&path)
        .await
        .with_context(|| format!("failed to open store at {path:?}"))?;
      tracing::info!(path = %path.display(), "opened sqlite store");
      serve(store, &address).await
    }
    StoreEndpoint::Rest(base_url) => {
      tracing::info!(%base_url, "using hosted store");
      let store = RestStore::new(RestConfig {
        base_url,
        api_key: server_cfg.store_key.clone(),
      })
      .context("failed to build store client")?;
      serve(store, &address).await
    }
  }
}

async fn serve<S>(store: S, address: &str) -> anyhow::Result<()>
where
  S: TicketStore + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let app = helpdesk_server::app(Arc::new(store));

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
