//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler or extractor.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("Unauthorized")]
  Unauthorized,

  #[error("Admin access required")]
  Forbidden,

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  /// An external collaborator failed or answered with something unusable.
  #[error("{0}")]
  Upstream(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    ApiError::Store(Box::new(e))
  }
}

impl From<haven_core::Error> for ApiError {
  fn from(e: haven_core::Error) -> Self {
    ApiError::BadRequest(e.to_string())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::Unauthorized => {
        (StatusCode::UNAUTHORIZED, json!({ "ok": false, "error": self.to_string() }))
      }
      ApiError::Forbidden => {
        (StatusCode::FORBIDDEN, json!({ "ok": false, "error": self.to_string() }))
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "ok": false, "error": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "ok": false, "error": m })),
      ApiError::Upstream(m) => {
        tracing::warn!(error = %m, "upstream collaborator failed");
        (StatusCode::BAD_GATEWAY, json!({ "ok": false, "error": m }))
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store operation failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          json!({ "ok": false, "error": "Database operation failed", "details": e.to_string() }),
        )
      }
    };

    let mut res = (status, Json(body)).into_response();
    if matches!(self, ApiError::Unauthorized) {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"haven\""),
      );
    }
    res
  }
}
