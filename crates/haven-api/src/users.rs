//! Handlers for the caller's own account.

use axum::{Json, extract::State};
use haven_core::{store::SafetyStore, user::ProfileUpdate};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  AppState,
  auth::{CurrentUser, MaybeUser},
  body::JsonBody,
  error::ApiError,
};

/// `/auth/check-admin` — who is calling, and are they an admin?
///
/// Anonymous callers get `isAdmin: false` and `userId: null`.
pub async fn check_admin<S>(MaybeUser(user): MaybeUser) -> Json<Value>
where
  S: SafetyStore + Clone + 'static,
{
  match user {
    Some(u) => Json(json!({
      "ok": true,
      "isAdmin": u.is_admin,
      "userId": u.id,
      "email": u.email,
      "name": u.name,
    })),
    None => Json(json!({
      "ok": true,
      "isAdmin": false,
      "userId": null,
      "email": null,
      "name": null,
    })),
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileBody {
  pub name:      Option<String>,
  pub user_type: Option<String>,
  pub grade:     Option<String>,
  pub section:   Option<String>,
}

/// `/user/update-profile` — complete the caller's school profile.
pub async fn update_profile<S>(
  State(state): State<AppState<S>>,
  CurrentUser(user): CurrentUser,
  JsonBody(body): JsonBody<ProfileBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let update =
    ProfileUpdate::parse(body.name, body.user_type.as_deref(), body.grade, body.section)?;
  let user = state
    .store
    .update_profile(user.id, update)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
  Ok(Json(json!({ "ok": true, "user": user })))
}
