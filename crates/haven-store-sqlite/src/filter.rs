//! A small builder for parameterized `WHERE` clauses.
//!
//! Placeholders are numbered (`?1`, `?2`, ...) in the order conditions are
//! added, so the collected values can be bound with
//! [`rusqlite::params_from_iter`]. Column names are always static strings
//! supplied by the store; only values travel as parameters.

use rusqlite::{
  Connection,
  functions::FunctionFlags,
  types::{Value, ValueRef},
};

use crate::encode::like_pattern;

/// Name of the SQL function registered by [`register_functions`].
const LOWER_FN: &str = "unicode_lower";

/// Register `unicode_lower(x)`: full Unicode lowercasing, unlike SQLite's
/// built-in `lower()` and `LIKE`, which only fold ASCII. Numbers are
/// rendered as text so id columns can be searched too.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    LOWER_FN,
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      Ok(match ctx.get_raw(0) {
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).to_lowercase()),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Null | ValueRef::Blob(_) => None,
      })
    },
  )
}

#[derive(Debug, Default)]
pub struct Filter {
  clauses: Vec<String>,
  params:  Vec<Value>,
}

impl Filter {
  pub fn new() -> Self {
    Self::default()
  }

  fn next_placeholder(&mut self, value: Value) -> String {
    self.params.push(value);
    format!("?{}", self.params.len())
  }

  /// A condition with no parameters, e.g. `deleted_at IS NULL`.
  pub fn raw(mut self, clause: &str) -> Self {
    self.clauses.push(clause.to_owned());
    self
  }

  pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
    let p = self.next_placeholder(value.into());
    self.clauses.push(format!("{column} = {p}"));
    self
  }

  pub fn ge(mut self, column: &str, value: impl Into<Value>) -> Self {
    let p = self.next_placeholder(value.into());
    self.clauses.push(format!("{column} >= {p}"));
    self
  }

  pub fn le(mut self, column: &str, value: impl Into<Value>) -> Self {
    let p = self.next_placeholder(value.into());
    self.clauses.push(format!("{column} <= {p}"));
    self
  }

  /// `column` is NULL or at most `value`.
  pub fn le_or_null(mut self, column: &str, value: impl Into<Value>) -> Self {
    let p = self.next_placeholder(value.into());
    self.clauses.push(format!("({column} IS NULL OR {column} <= {p})"));
    self
  }

  /// Case-insensitive substring match of `needle` against any of `columns`.
  /// Both sides are lowercased with Unicode rules; the connection must have
  /// [`register_functions`] applied.
  pub fn contains(mut self, columns: &[&str], needle: &str) -> Self {
    let p = self.next_placeholder(Value::Text(like_pattern(&needle.to_lowercase())));
    let any = columns
      .iter()
      .map(|c| format!("{LOWER_FN}({c}) LIKE {p} ESCAPE '\\'"))
      .collect::<Vec<_>>()
      .join(" OR ");
    self.clauses.push(format!("({any})"));
    self
  }

  pub fn eq_opt(self, column: &str, value: Option<impl Into<Value>>) -> Self {
    match value {
      Some(v) => self.eq(column, v),
      None => self,
    }
  }

  pub fn ge_opt(self, column: &str, value: Option<impl Into<Value>>) -> Self {
    match value {
      Some(v) => self.ge(column, v),
      None => self,
    }
  }

  pub fn le_opt(self, column: &str, value: Option<impl Into<Value>>) -> Self {
    match value {
      Some(v) => self.le(column, v),
      None => self,
    }
  }

  pub fn contains_opt(self, columns: &[&str], needle: Option<&str>) -> Self {
    match needle.map(str::trim).filter(|n| !n.is_empty()) {
      Some(n) => self.contains(columns, n),
      None => self,
    }
  }

  /// `" WHERE a AND b"`, or an empty string when there are no conditions.
  pub fn where_clause(&self) -> String {
    if self.clauses.is_empty() {
      String::new()
    } else {
      format!(" WHERE {}", self.clauses.join(" AND "))
    }
  }

  /// Number of parameters bound so far; later placeholders continue from
  /// here.
  pub fn param_count(&self) -> usize {
    self.params.len()
  }

  pub fn into_params(self) -> Vec<Value> {
    self.params
  }
}
