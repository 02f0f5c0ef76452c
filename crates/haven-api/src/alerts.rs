//! Handlers for emergency alerts.
//!
//! | Path | Auth | Body |
//! |------|------|------|
//! | `/emergency-alerts` | - | none |
//! | `/admin/list-alerts` | admin | [`SearchBody`] |
//! | `/create-alert` | admin | [`CreateBody`] |
//! | `/delete-alert` | admin | `{"id": 1}` |

use axum::{Json, extract::State};
use haven_core::{
  alert::NewAlert,
  query::{AlertQuery, AlertSort, PageRequest, SortOrder},
  store::SafetyStore,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  AppState,
  auth::AdminUser,
  body::{IdBody, JsonBody, required_id},
  error::ApiError,
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// Live alerts, newest first.
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let alerts = state.store.list_alerts().await.map_err(ApiError::store)?;
  Ok(Json(json!({ "ok": true, "alerts": alerts })))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchBody {
  pub page:     Option<i64>,
  pub limit:    Option<i64>,
  /// `timestamp` | `title` | `severity`; anything else sorts by timestamp.
  pub sort:     Option<String>,
  /// `asc` | `desc` (default).
  pub order:    Option<String>,
  /// Unrecognised severities are ignored rather than rejected.
  pub severity: Option<String>,
  pub search:   Option<String>,
}

impl From<SearchBody> for AlertQuery {
  fn from(b: SearchBody) -> Self {
    AlertQuery {
      severity: b.severity.and_then(|s| s.trim().parse().ok()),
      search:   b.search,
      sort:     AlertSort::parse_or_default(b.sort.as_deref()),
      order:    SortOrder::parse_or_default(b.order.as_deref()),
      page:     PageRequest::new(b.page, b.limit),
    }
  }
}

pub async fn search<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  JsonBody(body): JsonBody<SearchBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let page = state
    .store
    .search_alerts(AlertQuery::from(body))
    .await
    .map_err(ApiError::store)?;

  Ok(Json(json!({
    "ok": true,
    "alerts": page.items,
    "pagination": page.pagination(),
  })))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateBody {
  pub title:    Option<String>,
  pub message:  Option<String>,
  pub severity: Option<String>,
}

pub async fn create<S>(
  State(state): State<AppState<S>>,
  AdminUser(admin): AdminUser,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let input = NewAlert::parse(body.title, body.message, body.severity.as_deref())?;
  let alert = state.store.create_alert(input).await.map_err(ApiError::store)?;
  tracing::info!(alert_id = alert.id, admin_id = admin.id, severity = %alert.severity, "alert created");
  Ok(Json(json!({ "ok": true, "alert": alert })))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

pub async fn delete<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  JsonBody(body): JsonBody<IdBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let id = required_id(body.id, "Missing alert ID")?;
  let alert = state
    .store
    .delete_alert(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Alert not found".into()))?;
  Ok(Json(json!({ "ok": true, "alert": alert })))
}
