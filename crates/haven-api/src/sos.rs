//! Handlers for SOS alerts.

use axum::{Json, extract::State};
use chrono::{Duration, Utc};
use haven_core::store::SafetyStore;
use serde_json::{Value, json};

use crate::{
  AppState,
  auth::CurrentUser,
  body::{IdBody, JsonBody, required_id},
  error::ApiError,
};

/// How far back `/sos/active` looks for pending SOS requests.
const ACTIVE_WINDOW_HOURS: i64 = 24;

/// `/sos/active` — pending SOS requests from the last day.
pub async fn active<S>(
  State(state): State<AppState<S>>,
  _user: CurrentUser,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let since = Utc::now() - Duration::hours(ACTIVE_WINDOW_HOURS);
  let requests = state
    .store
    .recent_sos_requests(since)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "ok": true, "requests": requests })))
}

/// `/sos/create` — record an SOS press and broadcast an emergency alert.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let alert = state.store.raise_sos(user.id).await.map_err(ApiError::store)?;
  tracing::info!(sos_alert_id = alert.id, user_id = user.id, "SOS raised");
  Ok(Json(json!({ "ok": true, "alert": alert })))
}

/// `/resolve-sos-alert` — resolve an alert and its linked request.
pub async fn resolve<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  JsonBody(body): JsonBody<IdBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let id = required_id(body.id, "SOS alert ID is required")?;
  let alert = state
    .store
    .resolve_sos_alert(id, user.id, Utc::now())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("SOS alert not found".into()))?;

  tracing::info!(sos_alert_id = id, request_id = ?alert.request_id, actor = user.id, "SOS resolved");
  Ok(Json(json!({ "ok": true, "alert": alert })))
}
