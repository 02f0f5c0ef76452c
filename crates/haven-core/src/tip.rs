//! Wellbeing tips, optionally scheduled for a future date.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::{
  Result,
  validate::{self, Bound},
};

pub const TIP_MAX_CHARS: usize = 500;

/// Accepted case-insensitively; always stored lower-case.
#[derive(
  Debug,
  Clone,
  Copy,
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
#[strum(ascii_case_insensitive)]
pub enum TipCategory {
  Mental,
  Physical,
  Emotional,
  Social,
  Environmental,
  Spiritual,
  Occupational,
  Financial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tip {
  pub id:            i64,
  pub tip:           String,
  pub category:      TipCategory,
  /// The tip is not served before this instant.
  pub scheduled_for: Option<DateTime<Utc>>,
  pub created_at:    DateTime<Utc>,
  pub deleted_at:    Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewTip {
  pub tip:           String,
  pub category:      TipCategory,
  pub scheduled_for: Option<DateTime<Utc>>,
}

impl NewTip {
  pub fn parse(
    tip: Option<String>,
    category: Option<&str>,
    scheduled_for: Option<&str>,
  ) -> Result<Self> {
    let tip = validate::required(tip, "Tip and category are required")?;
    let category = validate::required(
      category.map(str::to_owned),
      "Tip and category are required",
    )?;
    validate::max_chars(&tip, TIP_MAX_CHARS, "Tip must be less than 500 characters")?;
    let category = validate::choice(&category, "Category")?;
    let scheduled_for = validate::optional_instant(scheduled_for, Bound::Start)?;

    Ok(Self { tip, category, scheduled_for })
  }
}
