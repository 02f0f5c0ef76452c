//! First-aid guides with ordered steps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, validate};

pub const DEFAULT_TAG: &str = "General";

/// One step of a guide; stored as part of a JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideStep {
  pub description: String,
  #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
  pub image_url:   Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guide {
  pub id:         i64,
  pub title:      String,
  pub content:    String,
  pub category:   String,
  pub tag:        String,
  pub steps:      Vec<GuideStep>,
  pub created_by: Option<i64>,
  pub created_at: DateTime<Utc>,
  pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewGuide {
  pub title:      String,
  pub content:    String,
  pub category:   String,
  pub tag:        String,
  pub steps:      Vec<GuideStep>,
  pub created_by: Option<i64>,
}

impl NewGuide {
  pub fn parse(
    title: Option<String>,
    content: Option<String>,
    category: Option<String>,
    tag: Option<String>,
    steps: Vec<GuideStep>,
  ) -> Result<Self> {
    const MISSING: &str = "Missing required fields";
    let title = validate::required(title, MISSING)?;
    let content = validate::required(content, MISSING)?;
    let category = validate::required(category, MISSING)?;
    let tag = tag
      .map(|t| t.trim().to_owned())
      .filter(|t| !t.is_empty())
      .unwrap_or_else(|| DEFAULT_TAG.to_owned());

    Ok(Self { title, content, category, tag, steps, created_by: None })
  }
}
