//! Assistance requests and their status lifecycle.
//!
//! A request moves between `pending`, `acknowledged` and `resolved`. Each
//! transition stamps (or clears) the actor/timestamp pairs on the row; the
//! mapping from target status to stamps lives in [`StatusChange::stamps`] so
//! every backend applies the same rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::{Result, option::Urgency, validate};

pub const DEFAULT_LOCATION: &str = "Unknown";
pub const DEFAULT_DESCRIPTION: &str = "Emergency Assistance Needed";

/// The `type` column: an SOS press or a regular assistance request.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RequestKind {
  Sos,
  Assistance,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RequestStatus {
  Pending,
  Acknowledged,
  Resolved,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistanceRequest {
  pub id:              i64,
  #[serde(rename = "type")]
  pub kind:            RequestKind,
  pub location:        String,
  pub description:     String,
  pub category:        Option<String>,
  pub urgency:         Urgency,
  pub status:          RequestStatus,
  pub created_by:      Option<i64>,
  pub acknowledged_by: Option<i64>,
  pub acknowledged_at: Option<DateTime<Utc>>,
  pub resolved_by:     Option<i64>,
  pub resolved_at:     Option<DateTime<Utc>>,
  pub created_at:      DateTime<Utc>,
}

/// A request joined with the display names of the users it references.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestView {
  #[serde(flatten)]
  pub request:              AssistanceRequest,
  pub created_by_name:      Option<String>,
  pub acknowledged_by_name: Option<String>,
  pub resolved_by_name:     Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewRequest {
  pub kind:        RequestKind,
  pub location:    String,
  pub description: String,
  pub category:    Option<String>,
  pub urgency:     Urgency,
  pub created_by:  Option<i64>,
}

impl NewRequest {
  /// Validate raw client input, filling in the location/description
  /// defaults used when someone presses SOS without typing anything.
  pub fn parse(
    kind: Option<&str>,
    location: Option<String>,
    description: Option<String>,
    category: Option<String>,
    urgency: Option<&str>,
  ) -> Result<Self> {
    let kind = validate::required(kind.map(str::to_owned), "Invalid request type")
      .and_then(|k| validate::choice(&k, "type"))?;
    let non_blank = |v: Option<String>| {
      v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
    };

    Ok(Self {
      kind,
      location: non_blank(location).unwrap_or_else(|| DEFAULT_LOCATION.to_owned()),
      description: non_blank(description)
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_owned()),
      category: non_blank(category),
      urgency: validate::optional_choice(urgency, "urgency")?.unwrap_or_default(),
      created_by: None,
    })
  }
}

// ─── Status transitions ──────────────────────────────────────────────────────

/// What a transition does to one `(actor, timestamp)` column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
  /// Overwrite with the acting user and the transition time.
  Set { by: i64, at: DateTime<Utc> },
  /// Null both columns.
  Clear,
  /// Leave whatever was there.
  Keep,
}

/// Effect of a transition on the acknowledged and resolved column pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamps {
  pub acknowledged: Stamp,
  pub resolved:     Stamp,
}

/// A requested move of request `id` (which must be of `kind`) to `status`.
#[derive(Debug, Clone, Copy)]
pub struct StatusChange {
  pub id:     i64,
  pub kind:   RequestKind,
  pub status: RequestStatus,
  pub actor:  i64,
  pub at:     DateTime<Utc>,
}

impl StatusChange {
  /// - `pending` re-opens the request: both pairs are cleared.
  /// - `acknowledged` stamps the acknowledgement and clears any resolution.
  /// - `resolved` stamps the resolution and keeps the acknowledgement.
  ///
  /// No ordering is enforced; a request may be resolved without ever being
  /// acknowledged, and re-applying a status simply re-stamps it.
  pub fn stamps(&self) -> Stamps {
    let now = Stamp::Set { by: self.actor, at: self.at };
    match self.status {
      RequestStatus::Pending => Stamps { acknowledged: Stamp::Clear, resolved: Stamp::Clear },
      RequestStatus::Acknowledged => Stamps { acknowledged: now, resolved: Stamp::Clear },
      RequestStatus::Resolved => Stamps { acknowledged: Stamp::Keep, resolved: now },
    }
  }

  /// Whether the paired SOS alert should be resolved along with the request.
  pub fn resolves_sos_alert(&self) -> bool {
    self.kind == RequestKind::Sos && self.status == RequestStatus::Resolved
  }

  /// Whether a resolved SOS alert should go back to active, because its
  /// request is being moved out of `resolved`.
  pub fn reopens_sos_alert(&self) -> bool {
    self.kind == RequestKind::Sos && self.status != RequestStatus::Resolved
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn change(kind: RequestKind, status: RequestStatus) -> StatusChange {
    StatusChange { id: 1, kind, status, actor: 7, at: Utc::now() }
  }

  #[test]
  fn defaults_fill_blank_fields() {
    let req = NewRequest::parse(Some("sos"), None, Some("  ".into()), None, None).unwrap();
    assert_eq!(req.kind, RequestKind::Sos);
    assert_eq!(req.location, DEFAULT_LOCATION);
    assert_eq!(req.description, DEFAULT_DESCRIPTION);
    assert_eq!(req.urgency, Urgency::Normal);
  }

  #[test]
  fn type_is_required() {
    let err = NewRequest::parse(None, None, None, None, None).unwrap_err();
    assert_eq!(err.to_string(), "Invalid request type");
    assert!(NewRequest::parse(Some("panic"), None, None, None, None).is_err());
  }

  #[test]
  fn invalid_urgency_is_rejected() {
    assert!(NewRequest::parse(Some("assistance"), None, None, None, Some("later")).is_err());
  }

  #[test]
  fn resolving_keeps_acknowledgement() {
    let c = change(RequestKind::Assistance, RequestStatus::Resolved);
    let stamps = c.stamps();
    assert_eq!(stamps.acknowledged, Stamp::Keep);
    assert_eq!(stamps.resolved, Stamp::Set { by: 7, at: c.at });
  }

  #[test]
  fn sos_alert_follows_resolution() {
    let resolve = change(RequestKind::Sos, RequestStatus::Resolved);
    assert!(resolve.resolves_sos_alert());
    assert!(!resolve.reopens_sos_alert());

    let reopen = change(RequestKind::Sos, RequestStatus::Pending);
    assert!(reopen.reopens_sos_alert());
    assert!(change(RequestKind::Sos, RequestStatus::Acknowledged).reopens_sos_alert());
    assert!(!change(RequestKind::Assistance, RequestStatus::Pending).reopens_sos_alert());
  }

  #[test]
  fn acknowledging_clears_resolution() {
    let c = change(RequestKind::Assistance, RequestStatus::Acknowledged);
    let stamps = c.stamps();
    assert_eq!(stamps.acknowledged, Stamp::Set { by: 7, at: c.at });
    assert_eq!(stamps.resolved, Stamp::Clear);
  }

  #[test]
  fn reopening_clears_everything() {
    let stamps = change(RequestKind::Sos, RequestStatus::Pending).stamps();
    assert_eq!(stamps, Stamps { acknowledged: Stamp::Clear, resolved: Stamp::Clear });
  }

  #[test]
  fn only_resolved_sos_touches_alert() {
    assert!(change(RequestKind::Sos, RequestStatus::Resolved).resolves_sos_alert());
    assert!(!change(RequestKind::Sos, RequestStatus::Acknowledged).resolves_sos_alert());
    assert!(!change(RequestKind::Assistance, RequestStatus::Resolved).resolves_sos_alert());
  }
}
