//! HTTP Basic-auth extractors.
//!
//! Credentials are `email:password`, checked against the argon2 PHC hash
//! stored for the user. Handlers declare what they need:
//!
//! - [`CurrentUser`]: any authenticated user, else 401.
//! - [`AdminUser`]: an authenticated admin, else 401 / 403.
//! - [`MaybeUser`]: anonymous callers pass through; bad credentials are
//!   still rejected.

use std::sync::LazyLock;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use haven_core::{store::SafetyStore, user::AuthUser};
use rand_core::OsRng;

use crate::{AppState, error::ApiError};

/// Hash `password` into an argon2 PHC string for `auth_users.password_hash`.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

/// A hash of a throwaway password, verified against when the email is
/// unknown so both failure paths pay for one argon2 run.
static DUMMY_HASH: LazyLock<Option<String>> =
  LazyLock::new(|| hash_password("haven-unknown-user").ok());

fn burn_verification(password: &str) {
  if let Some(hash) = DUMMY_HASH.as_deref()
    && let Ok(parsed) = PasswordHash::new(hash)
  {
    let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
  }
}

/// Split a `Basic` authorization header into `(email, password)`.
///
/// `Ok(None)` when there is no header at all.
fn basic_credentials(headers: &HeaderMap) -> Result<Option<(String, String)>, ApiError> {
  let Some(value) = headers.get(header::AUTHORIZATION) else {
    return Ok(None);
  };
  let value = value.to_str().map_err(|_| ApiError::Unauthorized)?;

  let encoded = value.strip_prefix("Basic ").ok_or(ApiError::Unauthorized)?;
  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (email, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;
  Ok(Some((email.to_owned(), password.to_owned())))
}

/// Resolve the caller, if any credentials were presented.
async fn authenticate<S>(headers: &HeaderMap, store: &S) -> Result<Option<AuthUser>, ApiError>
where
  S: SafetyStore,
{
  let Some((email, password)) = basic_credentials(headers)? else {
    return Ok(None);
  };

  let Some(creds) = store.find_credentials(email).await.map_err(ApiError::store)? else {
    burn_verification(&password);
    return Err(ApiError::Unauthorized);
  };

  let parsed_hash =
    PasswordHash::new(&creds.password_hash).map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(Some(creds.user))
}

/// The authenticated caller.
pub struct CurrentUser(pub AuthUser);

/// The authenticated caller, known to be an admin.
pub struct AdminUser(pub AuthUser);

/// The caller if credentials were presented, `None` for anonymous requests.
pub struct MaybeUser(pub Option<AuthUser>);

impl<S> FromRequestParts<AppState<S>> for MaybeUser
where
  S: SafetyStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    Ok(MaybeUser(authenticate(&parts.headers, state.store.as_ref()).await?))
  }
}

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: SafetyStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    authenticate(&parts.headers, state.store.as_ref())
      .await?
      .map(CurrentUser)
      .ok_or(ApiError::Unauthorized)
  }
}

impl<S> FromRequestParts<AppState<S>> for AdminUser
where
  S: SafetyStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
    if !user.is_admin {
      return Err(ApiError::Forbidden);
    }
    Ok(AdminUser(user))
  }
}
