//! Handlers for assistance request options.
//!
//! Options are never deleted: `/delete-assistance-option` only clears
//! `is_active`, which hides the option from `/list-assistance-options`.

use axum::{Json, extract::State};
use haven_core::{
  option::{NewOption, OptionPatch},
  store::SafetyStore,
  validate,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  AppState,
  auth::AdminUser,
  body::{IdBody, JsonBody, required_id},
  error::ApiError,
};

pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let options = state.store.list_options().await.map_err(ApiError::store)?;
  Ok(Json(json!({ "ok": true, "options": options })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OptionBody {
  pub id:         Option<i64>,
  pub label:      Option<String>,
  pub category:   Option<String>,
  pub urgency:    Option<String>,
  pub sort_order: Option<i64>,
  pub is_active:  Option<bool>,
}

pub async fn create<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  JsonBody(body): JsonBody<OptionBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let input = NewOption::parse(
    body.label,
    body.category.as_deref(),
    body.urgency.as_deref(),
    body.sort_order,
  )?;
  let option = state.store.create_option(input).await.map_err(ApiError::store)?;
  Ok(Json(json!({ "ok": true, "option": option })))
}

pub async fn update<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  JsonBody(body): JsonBody<OptionBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let id = required_id(body.id, "Option ID is required")?;
  let patch = OptionPatch {
    label:      body.label,
    category:   validate::optional_choice(body.category.as_deref(), "category")?,
    urgency:    validate::optional_choice(body.urgency.as_deref(), "urgency")?,
    sort_order: body.sort_order,
    is_active:  body.is_active,
  };
  patch.validate()?;

  let option = state
    .store
    .update_option(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Option not found".into()))?;
  Ok(Json(json!({ "ok": true, "option": option })))
}

pub async fn delete<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  JsonBody(body): JsonBody<IdBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let id = required_id(body.id, "Option ID is required")?;
  let option = state
    .store
    .deactivate_option(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Option not found".into()))?;
  Ok(Json(json!({ "ok": true, "option": option })))
}
