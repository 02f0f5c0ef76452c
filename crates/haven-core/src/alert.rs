//! Emergency alerts — short broadcast messages shown on the public page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::{Result, validate};

pub const TITLE_MAX_CHARS: usize = 200;
pub const MESSAGE_MAX_CHARS: usize = 1000;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
  #[default]
  Low,
  Medium,
  High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
  pub id:         i64,
  pub title:      String,
  pub message:    String,
  pub severity:   Severity,
  pub timestamp:  DateTime<Utc>,
  pub deleted_at: Option<DateTime<Utc>>,
}

/// Input to [`crate::store::SafetyStore::create_alert`].
#[derive(Debug, Clone)]
pub struct NewAlert {
  pub title:    String,
  pub message:  String,
  pub severity: Severity,
}

impl NewAlert {
  /// Validate raw client input. Title and message are trimmed.
  pub fn parse(
    title: Option<String>,
    message: Option<String>,
    severity: Option<&str>,
  ) -> Result<Self> {
    let title = validate::required(title, "Title and message are required")?;
    let message = validate::required(message, "Title and message are required")?;
    let severity =
      validate::optional_choice(severity, "severity")?.unwrap_or_default();

    validate::max_chars(
      &title,
      TITLE_MAX_CHARS,
      "Title must be less than 200 characters",
    )?;
    validate::max_chars(
      &message,
      MESSAGE_MAX_CHARS,
      "Message must be less than 1000 characters",
    )?;

    Ok(Self { title, message, severity })
  }

  /// The alert broadcast whenever someone raises an SOS.
  pub fn sos_broadcast() -> Self {
    Self {
      title:    "SOS ALERT".to_owned(),
      message:  "🚨 EMERGENCY: SOS Signal Received!".to_owned(),
      severity: Severity::High,
    }
  }
}
