//! Error types for `haven-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// User input failed validation. The message is safe to show to clients.
  #[error("{0}")]
  Validation(String),
}

impl Error {
  pub fn validation(message: impl Into<String>) -> Self {
    Self::Validation(message.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
