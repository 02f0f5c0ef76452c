//! Handlers for first-aid guides.

use axum::{Json, extract::State};
use haven_core::{
  guide::{GuideStep, NewGuide},
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

/// `/first-aid-guides` — live guides by category, then title.
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let guides = state.store.list_guides().await.map_err(ApiError::store)?;
  Ok(Json(json!({ "ok": true, "guides": guides })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateBody {
  pub title:    Option<String>,
  pub content:  Option<String>,
  pub category: Option<String>,
  pub tag:      Option<String>,
  pub steps:    Vec<GuideStep>,
}

/// `/create-guide` — the calling admin is recorded as the author.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  AdminUser(admin): AdminUser,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let mut input =
    NewGuide::parse(body.title, body.content, body.category, body.tag, body.steps)?;
  input.created_by = Some(admin.id);
  let guide = state.store.create_guide(input).await.map_err(ApiError::store)?;
  Ok(Json(json!({ "ok": true, "guide": guide })))
}

pub async fn delete<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  JsonBody(body): JsonBody<IdBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let id = required_id(body.id, "Missing guide ID")?;
  let guide = state
    .store
    .delete_guide(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Guide not found".into()))?;
  Ok(Json(json!({ "ok": true, "guide": guide })))
}
