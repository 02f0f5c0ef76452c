//! Field-level validation shared by the input types.
//!
//! Every helper returns [`Error::Validation`] with a message that is shown to
//! the client verbatim.

use std::{str::FromStr, sync::LazyLock};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use strum::VariantNames;

use crate::{Error, Result};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
    .expect("email pattern compiles")
});

// E.164: optional plus, no leading zero, at most 15 digits.
static PHONE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{1,14}$").expect("phone pattern compiles"));

/// Trim `value` and fail with `message` when it is missing or blank.
pub fn required(value: Option<String>, message: &str) -> Result<String> {
  match value.as_deref().map(str::trim) {
    Some(v) if !v.is_empty() => Ok(v.to_owned()),
    _ => Err(Error::validation(message)),
  }
}

/// Fail with `message` when `value` is longer than `max` characters.
pub fn max_chars(value: &str, max: usize, message: &str) -> Result<()> {
  if value.chars().count() > max {
    return Err(Error::validation(message));
  }
  Ok(())
}

pub fn email(value: &str) -> Result<()> {
  if !EMAIL_RE.is_match(value) {
    return Err(Error::validation("Invalid email format"));
  }
  Ok(())
}

pub fn phone(value: &str) -> Result<()> {
  if !PHONE_RE.is_match(value) {
    return Err(Error::validation("Invalid phone format"));
  }
  Ok(())
}

/// Parse one of the closed vocabularies (severity, category, urgency, ...).
///
/// The error lists the accepted values, e.g.
/// `severity must be one of: low, medium, high`.
pub fn choice<T>(value: &str, label: &str) -> Result<T>
where
  T: FromStr + VariantNames,
{
  value.trim().parse().map_err(|_| {
    Error::validation(format!(
      "{label} must be one of: {}",
      T::VARIANTS.join(", ")
    ))
  })
}

/// [`choice`] lifted over an optional field; blank strings count as absent.
pub fn optional_choice<T>(value: Option<&str>, label: &str) -> Result<Option<T>>
where
  T: FromStr + VariantNames,
{
  match value.map(str::trim) {
    Some(v) if !v.is_empty() => choice(v, label).map(Some),
    _ => Ok(None),
  }
}

/// Which end of a date range a bare calendar date should snap to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
  Start,
  End,
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
///
/// A bare date is read as the first (`Bound::Start`) or last
/// (`Bound::End`) instant of that UTC day.
pub fn instant(value: &str, bound: Bound) -> Result<DateTime<Utc>> {
  let value = value.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
    return Ok(dt.with_timezone(&Utc));
  }
  let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
    .map_err(|_| Error::validation(format!("Invalid date format: {value:?}")))?;
  let time = match bound {
    Bound::Start => NaiveTime::from_hms_opt(0, 0, 0),
    Bound::End => NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999),
  }
  .unwrap_or_default();
  Ok(date.and_time(time).and_utc())
}

/// [`instant`] lifted over an optional field; blank strings count as absent.
pub fn optional_instant(
  value: Option<&str>,
  bound: Bound,
) -> Result<Option<DateTime<Utc>>> {
  match value.map(str::trim) {
    Some(v) if !v.is_empty() => instant(v, bound).map(Some),
    _ => Ok(None),
  }
}
