//! Emergency contacts: counsellors, nurses, crisis lines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::{Error, Result, validate};

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
pub enum ContactType {
  Emergency,
  Counseling,
  Medical,
  #[default]
  General,
  Crisis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
  pub id:              i64,
  pub name:            String,
  pub role:            String,
  pub phone:           String,
  pub email:           String,
  pub description:     Option<String>,
  pub available_hours: Option<String>,
  pub contact_type:    ContactType,
  pub is_available:    bool,
  pub sort_order:      i64,
  pub created_at:      DateTime<Utc>,
  pub deleted_at:      Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewContact {
  pub name:            String,
  pub role:            String,
  pub phone:           String,
  pub email:           String,
  pub description:     Option<String>,
  pub available_hours: Option<String>,
  pub contact_type:    ContactType,
  pub is_available:    bool,
  pub sort_order:      i64,
}

impl NewContact {
  /// Check the required fields and the email/phone formats.
  pub fn validate(&self) -> Result<()> {
    let required = [&self.name, &self.role, &self.phone, &self.email];
    if required.iter().any(|v| v.trim().is_empty()) {
      return Err(Error::validation(
        "Name, role, phone and email are required fields",
      ));
    }
    validate::email(&self.email)?;
    validate::phone(&self.phone)?;
    Ok(())
  }
}

/// A partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
  pub name:            Option<String>,
  pub role:            Option<String>,
  pub phone:           Option<String>,
  pub email:           Option<String>,
  pub description:     Option<String>,
  pub available_hours: Option<String>,
  pub contact_type:    Option<ContactType>,
  pub is_available:    Option<bool>,
  pub sort_order:      Option<i64>,
}

impl ContactPatch {
  pub fn validate(&self) -> Result<()> {
    if let Some(email) = self.email.as_deref() {
      validate::email(email)?;
    }
    if let Some(phone) = self.phone.as_deref() {
      validate::phone(phone)?;
    }
    Ok(())
  }
}
