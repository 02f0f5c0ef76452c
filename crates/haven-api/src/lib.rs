//! JSON API for Haven.
//!
//! Exposes an axum [`Router`] backed by any [`haven_core::store::SafetyStore`].
//! Every endpoint is `POST` with a flat JSON object body; responses are
//! `{"ok": true, ...}` on success and `{"ok": false, "error": ...}` otherwise.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", haven_api::api_router(state))
//! ```

pub mod alerts;
pub mod auth;
pub mod body;
pub mod chat;
pub mod contacts;
pub mod error;
pub mod guides;
pub mod options;
pub mod requests;
pub mod sos;
pub mod tips;
pub mod users;
pub mod weather;

use std::sync::Arc;

use axum::{Router, routing::post};
use haven_core::store::SafetyStore;

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Endpoints and credentials for the external collaborators.
#[derive(Clone, Debug)]
pub struct Integrations {
  pub http:         reqwest::Client,
  /// Base URL of the weather-by-city service; `/weather/{city}` is appended.
  pub weather_url:  String,
  /// Full URL of the chat-completion endpoint.
  pub chat_url:     String,
  pub chat_api_key: Option<String>,
  pub chat_model:   Option<String>,
}

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: SafetyStore> {
  pub store:        Arc<S>,
  pub integrations: Arc<Integrations>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: SafetyStore + Clone + 'static,
{
  Router::new()
    // Alerts
    .route("/emergency-alerts",          post(alerts::list::<S>))
    .route("/admin/list-alerts",         post(alerts::search::<S>))
    .route("/create-alert",              post(alerts::create::<S>))
    .route("/delete-alert",              post(alerts::delete::<S>))
    // Tips
    .route("/wellbeing-tip",             post(tips::random::<S>))
    .route("/admin/list-tips",           post(tips::search::<S>))
    .route("/create-tip",                post(tips::create::<S>))
    .route("/delete-tip",                post(tips::delete::<S>))
    // Guides
    .route("/first-aid-guides",          post(guides::list::<S>))
    .route("/create-guide",              post(guides::create::<S>))
    .route("/delete-guide",              post(guides::delete::<S>))
    // Contacts
    .route("/get-emergency-contacts",    post(contacts::list::<S>))
    .route("/create-contact",            post(contacts::create::<S>))
    .route("/update-contact",            post(contacts::update::<S>))
    .route("/delete-contact",            post(contacts::delete::<S>))
    // Assistance options
    .route("/list-assistance-options",   post(options::list::<S>))
    .route("/create-assistance-option",  post(options::create::<S>))
    .route("/update-assistance-option",  post(options::update::<S>))
    .route("/delete-assistance-option",  post(options::delete::<S>))
    // Requests
    .route("/create-assistance-request", post(requests::create::<S>))
    .route("/update-request-status",     post(requests::update_status::<S>))
    .route("/get-active-requests",       post(requests::active::<S>))
    .route("/list-requests",             post(requests::list::<S>))
    .route("/admin/dashboard-stats",     post(requests::dashboard_stats::<S>))
    // SOS
    .route("/sos/active",                post(sos::active::<S>))
    .route("/sos/create",                post(sos::create::<S>))
    .route("/resolve-sos-alert",         post(sos::resolve::<S>))
    // Users
    .route("/auth/check-admin",          post(users::check_admin::<S>))
    .route("/user/update-profile",       post(users::update_profile::<S>))
    // Collaborators
    .route("/get-weather",               post(weather::handler::<S>))
    .route("/chat",                      post(chat::handler::<S>))
    .with_state(state)
}
