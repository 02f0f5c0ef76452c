//! Handlers for wellbeing tips.
//!
//! | Path | Auth | Body |
//! |------|------|------|
//! | `/wellbeing-tip` | - | `{"category"?}` |
//! | `/admin/list-tips` | admin | [`SearchBody`] |
//! | `/create-tip` | admin | [`CreateBody`] |
//! | `/delete-tip` | admin | `{"id": 1}` |

use axum::{Json, extract::State};
use chrono::Utc;
use haven_core::{
  query::{PageRequest, TipQuery},
  store::SafetyStore,
  tip::{NewTip, TipCategory},
  validate::{self, Bound},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
  AppState,
  auth::AdminUser,
  body::{IdBody, JsonBody, required_id},
  error::ApiError,
};

const CATEGORY: &str = "Category";

// ─── Random ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RandomBody {
  pub category: Option<String>,
}

/// A random tip that is due; `"tip": null` when there is none.
pub async fn random<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<RandomBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let category: Option<TipCategory> =
    validate::optional_choice(body.category.as_deref(), CATEGORY)?;
  let tip = state
    .store
    .random_tip(category, Utc::now())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(json!({ "ok": true, "tip": tip })))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchBody {
  pub page:       Option<i64>,
  pub limit:      Option<i64>,
  pub category:   Option<String>,
  pub search:     Option<String>,
  /// Lower bound on `created_at`; RFC 3339 or `YYYY-MM-DD`.
  pub start_date: Option<String>,
  /// Upper bound on `created_at`; a bare date includes the whole day.
  pub end_date:   Option<String>,
}

impl TryFrom<SearchBody> for TipQuery {
  type Error = haven_core::Error;

  fn try_from(b: SearchBody) -> Result<Self, Self::Error> {
    Ok(TipQuery {
      category:       validate::optional_choice(b.category.as_deref(), CATEGORY)?,
      search:         b.search,
      created_after:  validate::optional_instant(b.start_date.as_deref(), Bound::Start)?,
      created_before: validate::optional_instant(b.end_date.as_deref(), Bound::End)?,
      page:           PageRequest::new(b.page, b.limit),
    })
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
    .search_tips(TipQuery::try_from(body)?)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(json!({
    "ok": true,
    "tips": page.items,
    "pagination": page.pagination(),
  })))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateBody {
  pub tip:           Option<String>,
  pub category:      Option<String>,
  #[serde(rename = "scheduledFor")]
  pub scheduled_for: Option<String>,
}

pub async fn create<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  JsonBody(body): JsonBody<CreateBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let input = NewTip::parse(
    body.tip,
    body.category.as_deref(),
    body.scheduled_for.as_deref(),
  )?;
  let tip = state.store.create_tip(input).await.map_err(ApiError::store)?;
  Ok(Json(json!({ "ok": true, "tip": tip })))
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
  let id = required_id(body.id, "Missing tip ID")?;
  let tip = state
    .store
    .delete_tip(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Tip not found".into()))?;
  Ok(Json(json!({ "ok": true, "tip": tip })))
}
