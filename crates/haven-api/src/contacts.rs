//! Handlers for emergency contacts.
//!
//! | Path | Auth | Body |
//! |------|------|------|
//! | `/get-emergency-contacts` | - | `{"type"?, "available"?}` |
//! | `/create-contact` | admin | [`ContactBody`] |
//! | `/update-contact` | admin | [`ContactBody`] plus `id` |
//! | `/delete-contact` | admin | `{"id": 1}` |

use axum::{Json, extract::State};
use haven_core::{
  contact::{ContactPatch, ContactType, NewContact},
  query::ContactQuery,
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

fn contact_type(raw: Option<&str>) -> Result<Option<ContactType>, ApiError> {
  Ok(validate::optional_choice(raw, "contact_type")?)
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListBody {
  /// A contact type, or `all` for no filter.
  #[serde(rename = "type")]
  pub kind:      Option<String>,
  /// `true` restricts to available contacts.
  pub available: Option<bool>,
}

pub async fn list<S>(
  State(state): State<AppState<S>>,
  JsonBody(body): JsonBody<ListBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let kind = body.kind.as_deref().filter(|k| !k.trim().eq_ignore_ascii_case("all"));
  let query = ContactQuery {
    contact_type:   contact_type(kind)?,
    available_only: body.available == Some(true),
  };
  let contacts = state.store.list_contacts(query).await.map_err(ApiError::store)?;
  Ok(Json(json!({ "ok": true, "contacts": contacts })))
}

// ─── Create / update ──────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactBody {
  pub id:              Option<i64>,
  pub name:            Option<String>,
  pub role:            Option<String>,
  pub phone:           Option<String>,
  pub email:           Option<String>,
  pub description:     Option<String>,
  pub available_hours: Option<String>,
  pub contact_type:    Option<String>,
  pub is_available:    Option<bool>,
  pub sort_order:      Option<i64>,
}

pub async fn create<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  JsonBody(body): JsonBody<ContactBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let input = NewContact {
    contact_type:    contact_type(body.contact_type.as_deref())?.unwrap_or_default(),
    name:            body.name.unwrap_or_default(),
    role:            body.role.unwrap_or_default(),
    phone:           body.phone.unwrap_or_default(),
    email:           body.email.unwrap_or_default(),
    description:     body.description,
    available_hours: body.available_hours,
    is_available:    body.is_available.unwrap_or(true),
    sort_order:      body.sort_order.unwrap_or(0),
  };
  input.validate()?;

  let contact = state.store.create_contact(input).await.map_err(ApiError::store)?;
  Ok(Json(json!({ "ok": true, "contact": contact })))
}

pub async fn update<S>(
  State(state): State<AppState<S>>,
  _admin: AdminUser,
  JsonBody(body): JsonBody<ContactBody>,
) -> Result<Json<Value>, ApiError>
where
  S: SafetyStore + Clone + 'static,
{
  let id = required_id(body.id, "Missing contact ID")?;
  let patch = ContactPatch {
    contact_type:    contact_type(body.contact_type.as_deref())?,
    name:            body.name,
    role:            body.role,
    phone:           body.phone,
    email:           body.email,
    description:     body.description,
    available_hours: body.available_hours,
    is_available:    body.is_available,
    sort_order:      body.sort_order,
  };
  patch.validate()?;

  let contact = state
    .store
    .update_contact(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Contact not found".into()))?;
  Ok(Json(json!({ "ok": true, "contact": contact })))
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
  let id = required_id(body.id, "Contact ID is required")?;
  let contact = state
    .store
    .delete_contact(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Contact not found".into()))?;
  Ok(Json(json!({ "ok": true, "contact": contact })))
}
