//! haven-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), layers `HAVEN_*`
//! environment variables on top, opens the SQLite store and serves the JSON
//! API under `/api`.
//!
//! # Provisioning users
//!
//! Accounts are created from the command line; the password is read from
//! stdin:
//!
//! ```text
//! cargo run -p haven-server -- add-user --email nurse@school.test --name "Nurse Joy" --admin
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use haven_api::auth::hash_password;
use haven_core::{store::SafetyStore, user::NewUser};
use haven_server::{ServerConfig, app, expand_tilde};
use haven_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Haven school safety server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Print the argon2 hash for a password entered on stdin and exit.
  HashPassword,
  /// Create a user; the password is read from stdin.
  AddUser {
    #[arg(long)]
    email: String,
    #[arg(long)]
    name:  Option<String>,
    /// Grant access to the admin endpoints.
    #[arg(long)]
    admin: bool,
  },
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

  let command = cli.command.unwrap_or(Command::Serve);
  if let Command::HashPassword = command {
    let password = read_password()?;
    let hash = hash_password(&password).map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("HAVEN"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match command {
    Command::AddUser { email, name, admin } => add_user(&store, email, name, admin).await,
    Command::Serve | Command::HashPassword => serve(store, &server_cfg).await,
  }
}

async fn serve(store: SqliteStore, server_cfg: &ServerConfig) -> anyhow::Result<()> {
  let integrations = server_cfg
    .integrations()
    .context("failed to build HTTP client")?;

  let router = app(store, integrations);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, router).await.context("server error")?;

  Ok(())
}

async fn add_user(
  store: &SqliteStore,
  email: String,
  name: Option<String>,
  is_admin: bool,
) -> anyhow::Result<()> {
  let password = read_password()?;
  if password.is_empty() {
    anyhow::bail!("password must not be empty");
  }
  let password_hash =
    hash_password(&password).map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;

  let user = store
    .create_user(NewUser { email, name, is_admin, password_hash })
    .await
    .context("failed to create user")?;

  tracing::info!(user_id = user.id, email = %user.email, is_admin, "user created");
  println!("{}", user.id);
  Ok(())
}

/// Read one password line from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}
