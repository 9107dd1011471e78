//! rolo-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite contact store, and serves the contacts API over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for a user's `password_hash`:
//!
//! ```text
//! cargo run -p rolo-server -- --hash-password
//! ```

use std::{io, path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use rolo_server::{
  AppState, ServerConfig,
  auth::{BasicAuthGate, hash_password},
};
use rolo_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Rolo contacts server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
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

  if cli.hash_password {
    let input = io::read_to_string(io::stdin()).context("failed to read stdin")?;
    let password = input.trim_end_matches(['\n', '\r']);
    anyhow::ensure!(!password.is_empty(), "no password given on stdin");
    let hash = hash_password(password)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ROLO"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  server_cfg.validate().context("invalid configuration")?;
  if server_cfg.users.is_empty() {
    tracing::warn!("no users configured; every API request will be rejected");
  }

  let store_path = server_cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  tracing::info!(path = %store_path.display(), "opened contact store");

  let state = AppState {
    gate:   Arc::new(BasicAuthGate::new(server_cfg.users.clone())),
    config: Arc::new(server_cfg.clone()),
  };

  let app = rolo_server::router(Arc::new(store), state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
