//! Authenticated users and their school profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::{Error, Result, validate};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserType {
  Student,
  Teacher,
  Staff,
}

/// A user as exposed to handlers. The password hash never leaves the store
/// except inside [`Credentials`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
  pub id:                    i64,
  pub email:                 String,
  pub name:                  Option<String>,
  pub is_admin:              bool,
  pub user_type:             Option<UserType>,
  pub grade:                 Option<String>,
  pub section:               Option<String>,
  pub has_completed_profile: bool,
  pub created_at:            DateTime<Utc>,
}

/// A user row together with its argon2 PHC hash, for login checks.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub user:          AuthUser,
  pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  pub name:          Option<String>,
  pub is_admin:      bool,
  pub password_hash: String,
}

impl NewUser {
  pub fn validate(&self) -> Result<()> {
    validate::email(&self.email)
  }
}

#[derive(Debug, Clone)]
pub struct ProfileUpdate {
  pub name:      String,
  pub user_type: UserType,
  pub grade:     Option<String>,
  pub section:   Option<String>,
}

impl ProfileUpdate {
  pub fn parse(
    name: Option<String>,
    user_type: Option<&str>,
    grade: Option<String>,
    section: Option<String>,
  ) -> Result<Self> {
    let name = name.map(|n| n.trim().to_owned()).unwrap_or_default();
    if name.chars().count() < 2 {
      return Err(Error::validation(
        "Name is required and must be at least 2 characters",
      ));
    }
    let user_type: UserType = user_type
      .and_then(|t| t.parse().ok())
      .ok_or_else(|| {
        Error::validation("Valid user type (student, teacher, or staff) is required")
      })?;

    let non_blank = |v: Option<String>| {
      v.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
    };
    let grade = non_blank(grade);
    if user_type == UserType::Student && grade.is_none() {
      return Err(Error::validation("Grade is required for students"));
    }

    Ok(Self { name, user_type, grade, section: non_blank(section) })
  }
}
