//! Haven HTTP server: configuration and the top-level axum application.
//!
//! The API from `haven-api` is mounted under `/api` and every request is
//! traced in a span carrying a fresh request id.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::{Router, extract::Request};
use haven_api::{AppState, Integrations, api_router};
use haven_core::store::SafetyStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` layered
/// under `HAVEN_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:              String,
  #[serde(default = "default_port")]
  pub port:              u16,
  #[serde(default = "default_store_path")]
  pub store_path:        PathBuf,
  #[serde(default = "default_weather_url")]
  pub weather_url:       String,
  #[serde(default = "default_chat_url")]
  pub chat_url:          String,
  #[serde(default)]
  pub chat_api_key:      Option<String>,
  #[serde(default)]
  pub chat_model:        Option<String>,
  #[serde(default = "default_http_timeout_secs")]
  pub http_timeout_secs: u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/haven/haven.db") }
fn default_weather_url() -> String { "http://127.0.0.1:8081".to_string() }
fn default_chat_url() -> String { "http://127.0.0.1:8082/v1/chat/completions".to_string() }
fn default_http_timeout_secs() -> u64 { 10 }

impl ServerConfig {
  /// Address to bind, as `host:port`.
  pub fn address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }

  /// Build the collaborator settings, including the shared HTTP client.
  pub fn integrations(&self) -> reqwest::Result<Integrations> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(self.http_timeout_secs))
      .build()?;
    Ok(Integrations {
      http,
      weather_url:  self.weather_url.clone(),
      chat_url:     self.chat_url.clone(),
      chat_api_key: self.chat_api_key.clone(),
      chat_model:   self.chat_model.clone(),
    })
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application ──────────────────────────────────────────────────────────────

/// The full application: `/api/*` plus request tracing.
pub fn app<S>(store: S, integrations: Integrations) -> Router
where
  S: SafetyStore + Clone + 'static,
{
  let state = AppState { store: Arc::new(store), integrations: Arc::new(integrations) };

  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
      tracing::info_span!(
        "request",
        id     = %Uuid::new_v4(),
        method = %req.method(),
        uri    = %req.uri(),
      )
    }))
}
