//! [`JsonBody`] — a lenient JSON body extractor.
//!
//! Unlike [`axum::Json`] it ignores `Content-Type`, treats an empty body as
//! `{}`, and rejects malformed input with the API's own error shape.

use axum::extract::{FromRequest, Request};
use bytes::Bytes;
use serde::{Deserialize, de::DeserializeOwned};

use crate::error::ApiError;

pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
  T: DeserializeOwned,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let bytes = Bytes::from_request(req, state)
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
      b"{}"
    } else {
      &bytes
    };

    serde_json::from_slice(raw)
      .map(JsonBody)
      .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {e}")))
  }
}

/// Body of the endpoints addressed by a single row id.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IdBody {
  pub id: Option<i64>,
}

/// Unwrap a required id field from a request body.
pub fn required_id(id: Option<i64>, message: &str) -> Result<i64, ApiError> {
  id.ok_or_else(|| ApiError::BadRequest(message.to_owned()))
}
