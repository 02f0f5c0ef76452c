//! Handlers for assistance requests and their status lifecycle.
//!
//! | Path | Auth | Body |
//! |------|------|------|
//! | `/create-assistance-request` | optional | [`CreateBody`] |
//! | `/update-request-status` | user | `{"id", "type", "status"}` |
//! | `/get-active-requests` | user | none |
//! | `/list-requests` | user | [`ListBody`] |
//! | `/admin/dashboard-stats` | admin | none |

use axum::{Json, extract::State};
use chrono::Utc;
use haven_core::{
  query::{RequestQuery, SortOrder},
  request::{NewRequest, RequestKind, RequestStatus, RequestView, StatusChange},
  store::SafetyStore,
  validate::{self, Bound},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  AppState,
  auth::{AdminUser, CurrentUser, MaybeUser},
  body::JsonBody,
  error::ApiError,
};

fn request_kind(raw: Option<&str>) -> Result<RequestKind, ApiError> {
  raw
    .and_then(|k| k.trim().parse().ok())
    .ok_or_else(|| ApiError::BadRequest("Invalid request type".into()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateBody {
  #[serde(rename = "type")]
  pub kind:        Option<String>,
  pub location:    Option<String>,
  pub description: Option<String>,
  pub category:    Option<String>,
  pub urgency:     Option<String>,
}

/// Anyone may ask for help; the caller is recorded when authenticated.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  MaybeUser(user): MaybeUser,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let mut input = NewRequest::parse(
    body.kind.as_deref(),
    body.location,
    body.description,
    body.category,
    body.urgency.as_deref(),
  )?;
  input.created_by = user.map(|u| u.id);

  let request = state.store.create_request(input).await.map_err(ApiError::store)?;
  tracing::info!(
    request_id = request.id,
    kind = %request.kind,
    urgency = %request.urgency,
    location = %request.location,
    "assistance request created"
  );
  Ok(Json(json!({ "ok": true, "request": request })))
}

// ─── Status update ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusBody {
  pub id:     Option<i64>,
  #[serde(rename = "type")]
  pub kind:   Option<String>,
  pub status: Option<String>,
}

pub async fn update_status<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  JsonBody(body): JsonBody<StatusBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let (Some(id), Some(kind), Some(status)) = (body.id, body.kind, body.status) else {
    return Err(ApiError::BadRequest("ID, type, and status are required".into()));
  };
  let status: RequestStatus = status
    .trim()
    .parse()
    .map_err(|_| ApiError::BadRequest("Invalid status".into()))?;
  let kind = request_kind(Some(&kind))?;

  let change = StatusChange { id, kind, status, actor: user.id, at: Utc::now() };
  let request = state
    .store
    .update_request_status(change)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Request not found".into()))?;

  tracing::info!(request_id = id, %kind, %status, actor = user.id, "request status updated");
  Ok(Json(json!({ "ok": true, "request": request })))
}

// ─── Active ───────────────────────────────────────────────────────────────────

/// Unresolved requests, split by kind.
pub async fn active<S>(
  State(state): State<AppState<S>>,
  _user: CurrentUser,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let (sos, assistance): (Vec<RequestView>, Vec<RequestView>) = state
    .store
    .active_requests()
    .await
    .map_err(ApiError::store)?
    .into_iter()
    .partition(|v| v.request.kind == RequestKind::Sos);

  Ok(Json(json!({ "ok": true, "sos": sos, "assistance": assistance })))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DateRange {
  pub start: Option<String>,
  pub end:   Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListBody {
  #[serde(rename = "type")]
  pub kind:       Option<String>,
  pub status:     Option<String>,
  pub date_range: Option<DateRange>,
  /// Substring over id, location and description.
  pub search:     Option<String>,
  /// `newest` (default) or `oldest`.
  pub sort:       Option<String>,
}

impl TryFrom<ListBody> for RequestQuery {
  type Error = ApiError;

  fn try_from(b: ListBody) -> Result<Self, Self::Error> {
    let range = b.date_range.unwrap_or_default();
    let mut query = RequestQuery::new(request_kind(b.kind.as_deref())?);
    query.status = validate::optional_choice(b.status.as_deref(), "status")?;
    query.created_after = validate::optional_instant(range.start.as_deref(), Bound::Start)?;
    query.created_before = validate::optional_instant(range.end.as_deref(), Bound::End)?;
    query.search = b.search;
    query.order = match b.sort.as_deref().map(str::trim) {
      Some("oldest") => SortOrder::Asc,
      _ => SortOrder::Desc,
    };
    Ok(query)
  }
}

pub async fn list<S>(
  State(state): State<AppState<S>>,
  _user: CurrentUser,
  JsonBody(body): JsonBody<ListBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let requests = state
    .store
    .list_requests(RequestQuery::try_from(body)?)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "ok": true, "requests": requests })))
}

// ─── Dashboard ────────────────────────────────────────────────────────────────

pub async fn dashboard_stats<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let stats = state.store.dashboard_stats().await.map_err(ApiError::store)?;
  Ok(Json(json!({
    "ok": true,
    "activeSosCount": stats.active_sos_count,
    "pendingAssistanceCount": stats.pending_assistance_count,
  })))
}
