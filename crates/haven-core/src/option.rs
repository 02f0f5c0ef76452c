//! Assistance request options: admin-managed templates offered to people
//! asking for help.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::{Error, Result, validate};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
pub enum OptionCategory {
  #[serde(rename = "Student Assistance")]
  #[strum(serialize = "Student Assistance")]
  Student,
  #[serde(rename = "Teacher Assistance")]
  #[strum(serialize = "Teacher Assistance")]
  Teacher,
  #[serde(rename = "Student/Teacher Assistance")]
  #[strum(serialize = "Student/Teacher Assistance")]
  StudentTeacher,
  #[serde(rename = "Other")]
  #[strum(serialize = "Other")]
  Other,
}

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
pub enum Urgency {
  Urgent,
  #[default]
  Normal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistanceOption {
  pub id:         i64,
  pub label:      String,
  pub category:   OptionCategory,
  pub urgency:    Urgency,
  pub sort_order: i64,
  /// Cleared instead of deleting the row.
  pub is_active:  bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOption {
  pub label:      String,
  pub category:   OptionCategory,
  pub urgency:    Urgency,
  pub sort_order: i64,
}

impl NewOption {
  pub fn parse(
    label: Option<String>,
    category: Option<&str>,
    urgency: Option<&str>,
    sort_order: Option<i64>,
  ) -> Result<Self> {
    let label = validate::required(label, "Label and category are required")?;
    let category = validate::required(
      category.map(str::to_owned),
      "Label and category are required",
    )?;
    Ok(Self {
      label,
      category: validate::choice(&category, "category")?,
      urgency: validate::optional_choice(urgency, "urgency")?.unwrap_or_default(),
      sort_order: sort_order.unwrap_or(0),
    })
  }
}

/// A partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default)]
pub struct OptionPatch {
  pub label:      Option<String>,
  pub category:   Option<OptionCategory>,
  pub urgency:    Option<Urgency>,
  pub sort_order: Option<i64>,
  pub is_active:  Option<bool>,
}

impl OptionPatch {
  pub fn is_empty(&self) -> bool {
    self.label.is_none()
      && self.category.is_none()
      && self.urgency.is_none()
      && self.sort_order.is_none()
      && self.is_active.is_none()
  }

  pub fn validate(&self) -> Result<()> {
    if self.is_empty() {
      return Err(Error::validation("No fields to update"));
    }
    if self.label.as_deref().is_some_and(|l| l.trim().is_empty()) {
      return Err(Error::validation("Label cannot be empty"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn category_uses_display_labels() {
    let opt = NewOption::parse(
      Some("Feeling unwell".into()),
      Some("Student/Teacher Assistance"),
      Some("urgent"),
      Some(3),
    )
    .unwrap();
    assert_eq!(opt.category, OptionCategory::StudentTeacher);
    assert_eq!(opt.category.to_string(), "Student/Teacher Assistance");
    assert_eq!(opt.urgency, Urgency::Urgent);
  }

  #[test]
  fn defaults() {
    let opt = NewOption::parse(Some("Other help".into()), Some("Other"), None, None).unwrap();
    assert_eq!(opt.urgency, Urgency::Normal);
    assert_eq!(opt.sort_order, 0);
  }

  #[test]
  fn rejects_unknown_category_and_urgency() {
    assert!(NewOption::parse(Some("x".into()), Some("Parents"), None, None).is_err());
    assert!(NewOption::parse(Some("x".into()), Some("Other"), Some("asap"), None).is_err());
  }

  #[test]
  fn empty_patch_is_rejected() {
    assert_eq!(
      OptionPatch::default().validate().unwrap_err().to_string(),
      "No fields to update"
    );
    let patch = OptionPatch { is_active: Some(false), ..Default::default() };
    assert!(patch.validate().is_ok());
  }
}
