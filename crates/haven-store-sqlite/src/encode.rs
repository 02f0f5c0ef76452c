//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with fixed microsecond
//! precision. Closed vocabularies are stored as their wire strings. Guide
//! steps are stored as compact JSON.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use haven_core::{
  alert::Alert,
  contact::Contact,
  guide::Guide,
  option::AssistanceOption,
  request::{AssistanceRequest, RequestView},
  sos::SosAlert,
  tip::Tip,
  user::{AuthUser, Credentials},
};
use rusqlite::Row;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── Closed vocabularies ─────────────────────────────────────────────────────

fn decode_enum<T: FromStr>(column: &'static str, value: String) -> Result<T> {
  value
    .parse()
    .map_err(|_| Error::UnknownValue { column, value })
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// `%needle%` with LIKE wildcards in `needle` escaped by `\`.
pub fn like_pattern(needle: &str) -> String {
  let mut out = String::with_capacity(needle.len() + 2);
  out.push('%');
  for c in needle.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Row types ───────────────────────────────────────────────────────────────
//
// Each `Raw*` struct mirrors one SELECT column list, read inside the
// connection thread, and is decoded into the domain type afterwards.

pub const ALERT_COLUMNS: &str = "id, title, message, severity, timestamp, deleted_at";

pub struct RawAlert {
  id:         i64,
  title:      String,
  message:    String,
  severity:   String,
  timestamp:  String,
  deleted_at: Option<String>,
}

impl RawAlert {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      title:      row.get(1)?,
      message:    row.get(2)?,
      severity:   row.get(3)?,
      timestamp:  row.get(4)?,
      deleted_at: row.get(5)?,
    })
  }

  pub fn into_alert(self) -> Result<Alert> {
    Ok(Alert {
      id:         self.id,
      title:      self.title,
      message:    self.message,
      severity:   decode_enum("severity", self.severity)?,
      timestamp:  decode_dt(&self.timestamp)?,
      deleted_at: decode_opt_dt(self.deleted_at)?,
    })
  }
}

pub const TIP_COLUMNS: &str = "id, tip, category, scheduled_for, created_at, deleted_at";

pub struct RawTip {
  id:            i64,
  tip:           String,
  category:      String,
  scheduled_for: Option<String>,
  created_at:    String,
  deleted_at:    Option<String>,
}

impl RawTip {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      tip:           row.get(1)?,
      category:      row.get(2)?,
      scheduled_for: row.get(3)?,
      created_at:    row.get(4)?,
      deleted_at:    row.get(5)?,
    })
  }

  pub fn into_tip(self) -> Result<Tip> {
    Ok(Tip {
      id:            self.id,
      tip:           self.tip,
      category:      decode_enum("category", self.category)?,
      scheduled_for: decode_opt_dt(self.scheduled_for)?,
      created_at:    decode_dt(&self.created_at)?,
      deleted_at:    decode_opt_dt(self.deleted_at)?,
    })
  }
}

pub const GUIDE_COLUMNS: &str =
  "id, title, content, category, tag, steps, created_by, created_at, deleted_at";

pub struct RawGuide {
  id:         i64,
  title:      String,
  content:    String,
  category:   String,
  tag:        String,
  steps:      String,
  created_by: Option<i64>,
  created_at: String,
  deleted_at: Option<String>,
}

impl RawGuide {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      title:      row.get(1)?,
      content:    row.get(2)?,
      category:   row.get(3)?,
      tag:        row.get(4)?,
      steps:      row.get(5)?,
      created_by: row.get(6)?,
      created_at: row.get(7)?,
      deleted_at: row.get(8)?,
    })
  }

  pub fn into_guide(self) -> Result<Guide> {
    Ok(Guide {
      id:         self.id,
      title:      self.title,
      content:    self.content,
      category:   self.category,
      tag:        self.tag,
      steps:      serde_json::from_str(&self.steps)?,
      created_by: self.created_by,
      created_at: decode_dt(&self.created_at)?,
      deleted_at: decode_opt_dt(self.deleted_at)?,
    })
  }
}

pub const CONTACT_COLUMNS: &str = "id, name, role, phone, email, description, \
   available_hours, contact_type, is_available, sort_order, created_at, deleted_at";

pub struct RawContact {
  id:              i64,
  name:            String,
  role:            String,
  phone:           String,
  email:           String,
  description:     Option<String>,
  available_hours: Option<String>,
  contact_type:    String,
  is_available:    bool,
  sort_order:      i64,
  created_at:      String,
  deleted_at:      Option<String>,
}

impl RawContact {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      name:            row.get(1)?,
      role:            row.get(2)?,
      phone:           row.get(3)?,
      email:           row.get(4)?,
      description:     row.get(5)?,
      available_hours: row.get(6)?,
      contact_type:    row.get(7)?,
      is_available:    row.get(8)?,
      sort_order:      row.get(9)?,
      created_at:      row.get(10)?,
      deleted_at:      row.get(11)?,
    })
  }

  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id:              self.id,
      name:            self.name,
      role:            self.role,
      phone:           self.phone,
      email:           self.email,
      description:     self.description,
      available_hours: self.available_hours,
      contact_type:    decode_enum("contact_type", self.contact_type)?,
      is_available:    self.is_available,
      sort_order:      self.sort_order,
      created_at:      decode_dt(&self.created_at)?,
      deleted_at:      decode_opt_dt(self.deleted_at)?,
    })
  }
}

pub const OPTION_COLUMNS: &str =
  "id, label, category, urgency, sort_order, is_active, created_at, updated_at";

pub struct RawOption {
  id:         i64,
  label:      String,
  category:   String,
  urgency:    String,
  sort_order: i64,
  is_active:  bool,
  created_at: String,
  updated_at: String,
}

impl RawOption {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      label:      row.get(1)?,
      category:   row.get(2)?,
      urgency:    row.get(3)?,
      sort_order: row.get(4)?,
      is_active:  row.get(5)?,
      created_at: row.get(6)?,
      updated_at: row.get(7)?,
    })
  }

  pub fn into_option(self) -> Result<AssistanceOption> {
    Ok(AssistanceOption {
      id:         self.id,
      label:      self.label,
      category:   decode_enum("category", self.category)?,
      urgency:    decode_enum("urgency", self.urgency)?,
      sort_order: self.sort_order,
      is_active:  self.is_active,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub const REQUEST_COLUMNS: &str = "id, type, location, description, category, urgency, \
   status, created_by, acknowledged_by, acknowledged_at, resolved_by, resolved_at, created_at";

/// [`REQUEST_COLUMNS`] qualified by `r`, plus the three joined user names.
pub const REQUEST_VIEW_COLUMNS: &str = "r.id, r.type, r.location, r.description, r.category, \
   r.urgency, r.status, r.created_by, r.acknowledged_by, r.acknowledged_at, r.resolved_by, \
   r.resolved_at, r.created_at, cu.name, au.name, ru.name";

pub const REQUEST_VIEW_FROM: &str = "assistance_requests r \
   LEFT JOIN auth_users cu ON cu.id = r.created_by \
   LEFT JOIN auth_users au ON au.id = r.acknowledged_by \
   LEFT JOIN auth_users ru ON ru.id = r.resolved_by";

pub struct RawRequest {
  id:              i64,
  kind:            String,
  location:        String,
  description:     String,
  category:        Option<String>,
  urgency:         String,
  status:          String,
  created_by:      Option<i64>,
  acknowledged_by: Option<i64>,
  acknowledged_at: Option<String>,
  resolved_by:     Option<i64>,
  resolved_at:     Option<String>,
  created_at:      String,
}

impl RawRequest {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      kind:            row.get(1)?,
      location:        row.get(2)?,
      description:     row.get(3)?,
      category:        row.get(4)?,
      urgency:         row.get(5)?,
      status:          row.get(6)?,
      created_by:      row.get(7)?,
      acknowledged_by: row.get(8)?,
      acknowledged_at: row.get(9)?,
      resolved_by:     row.get(10)?,
      resolved_at:     row.get(11)?,
      created_at:      row.get(12)?,
    })
  }

  pub fn id(&self) -> i64 {
    self.id
  }

  pub fn into_request(self) -> Result<AssistanceRequest> {
    Ok(AssistanceRequest {
      id:              self.id,
      kind:            decode_enum("type", self.kind)?,
      location:        self.location,
      description:     self.description,
      category:        self.category,
      urgency:         decode_enum("urgency", self.urgency)?,
      status:          decode_enum("status", self.status)?,
      created_by:      self.created_by,
      acknowledged_by: self.acknowledged_by,
      acknowledged_at: decode_opt_dt(self.acknowledged_at)?,
      resolved_by:     self.resolved_by,
      resolved_at:     decode_opt_dt(self.resolved_at)?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawRequestView {
  request:              RawRequest,
  created_by_name:      Option<String>,
  acknowledged_by_name: Option<String>,
  resolved_by_name:     Option<String>,
}

impl RawRequestView {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      request:              RawRequest::from_row(row)?,
      created_by_name:      row.get(13)?,
      acknowledged_by_name: row.get(14)?,
      resolved_by_name:     row.get(15)?,
    })
  }

  pub fn into_view(self) -> Result<RequestView> {
    Ok(RequestView {
      request:              self.request.into_request()?,
      created_by_name:      self.created_by_name,
      acknowledged_by_name: self.acknowledged_by_name,
      resolved_by_name:     self.resolved_by_name,
    })
  }
}

pub const SOS_COLUMNS: &str =
  "id, status, location, request_id, created_by, resolved_by, resolved_at, created_at";

pub struct RawSosAlert {
  id:          i64,
  status:      String,
  location:    Option<String>,
  request_id:  Option<i64>,
  created_by:  Option<i64>,
  resolved_by: Option<i64>,
  resolved_at: Option<String>,
  created_at:  String,
}

impl RawSosAlert {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      status:      row.get(1)?,
      location:    row.get(2)?,
      request_id:  row.get(3)?,
      created_by:  row.get(4)?,
      resolved_by: row.get(5)?,
      resolved_at: row.get(6)?,
      created_at:  row.get(7)?,
    })
  }

  pub fn request_id(&self) -> Option<i64> {
    self.request_id
  }

  pub fn into_sos_alert(self) -> Result<SosAlert> {
    Ok(SosAlert {
      id:          self.id,
      status:      decode_enum("status", self.status)?,
      location:    self.location,
      request_id:  self.request_id,
      created_by:  self.created_by,
      resolved_by: self.resolved_by,
      resolved_at: decode_opt_dt(self.resolved_at)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// User columns; `password_hash` is last so [`RawUser`] can skip it.
pub const USER_COLUMNS: &str = "id, email, name, is_admin, user_type, grade, section, \
   has_completed_profile, created_at, password_hash";

pub struct RawUser {
  id:                    i64,
  email:                 String,
  name:                  Option<String>,
  is_admin:              bool,
  user_type:             Option<String>,
  grade:                 Option<String>,
  section:               Option<String>,
  has_completed_profile: bool,
  created_at:            String,
  password_hash:         String,
}

impl RawUser {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                    row.get(0)?,
      email:                 row.get(1)?,
      name:                  row.get(2)?,
      is_admin:              row.get(3)?,
      user_type:             row.get(4)?,
      grade:                 row.get(5)?,
      section:               row.get(6)?,
      has_completed_profile: row.get(7)?,
      created_at:            row.get(8)?,
      password_hash:         row.get(9)?,
    })
  }

  pub fn into_credentials(self) -> Result<Credentials> {
    let user = AuthUser {
      id:                    self.id,
      email:                 self.email,
      name:                  self.name,
      is_admin:              self.is_admin,
      user_type:             self
        .user_type
        .map(|t| decode_enum("user_type", t))
        .transpose()?,
      grade:                 self.grade,
      section:               self.section,
      has_completed_profile: self.has_completed_profile,
      created_at:            decode_dt(&self.created_at)?,
    };
    Ok(Credentials { user, password_hash: self.password_hash })
  }

  pub fn into_user(self) -> Result<AuthUser> {
    Ok(self.into_credentials()?.user)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_are_fixed_width_and_sortable() {
    let a = DateTime::parse_from_rfc3339("2024-01-01T09:00:00Z").unwrap().with_timezone(&Utc);
    let b = DateTime::parse_from_rfc3339("2024-01-01T09:00:00.5Z").unwrap().with_timezone(&Utc);
    let (ea, eb) = (encode_dt(a), encode_dt(b));
    assert_eq!(ea, "2024-01-01T09:00:00.000000Z");
    assert_eq!(ea.len(), eb.len());
    assert!(ea < eb);
    assert_eq!(decode_dt(&eb).unwrap(), b);
  }

  #[test]
  fn like_pattern_escapes_wildcards() {
    assert_eq!(like_pattern("fire"), "%fire%");
    assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
  }
}
