//! SOS alerts — the emergency record paired with an SOS request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SosStatus {
  Active,
  Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SosAlert {
  pub id:          i64,
  pub status:      SosStatus,
  pub location:    Option<String>,
  /// The assistance request this alert was raised with, if any.
  pub request_id:  Option<i64>,
  pub created_by:  Option<i64>,
  pub resolved_by: Option<i64>,
  pub resolved_at: Option<DateTime<Utc>>,
  pub created_at:  DateTime<Utc>,
}
