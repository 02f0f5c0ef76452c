//! Filter and paging parameter objects for the list operations.
//!
//! Each query type names the filters a list endpoint understands. Backends
//! translate them into parameterized clauses; nothing here is ever spliced
//! into SQL as text except the closed sort enums.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
  alert::Severity,
  contact::ContactType,
  request::{RequestKind, RequestStatus},
  tip::TipCategory,
};

// ─── Paging ──────────────────────────────────────────────────────────────────

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A 1-based page number and a page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub page:  u32,
  pub limit: u32,
}

impl Default for PageRequest {
  fn default() -> Self {
    Self { page: 1, limit: DEFAULT_PAGE_SIZE }
  }
}

impl PageRequest {
  /// Clamp client-supplied values into range rather than rejecting them.
  pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
    let page = page.unwrap_or(1).clamp(1, i64::from(u32::MAX)) as u32;
    let limit = limit
      .unwrap_or(i64::from(DEFAULT_PAGE_SIZE))
      .clamp(1, i64::from(MAX_PAGE_SIZE)) as u32;
    Self { page, limit }
  }

  pub fn offset(&self) -> u64 {
    u64::from(self.page - 1) * u64::from(self.limit)
  }
}

/// One page of results plus the total row count across all pages.
#[derive(Debug, Clone)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub total: u64,
  pub page:  PageRequest,
}

impl<T> Page<T> {
  pub fn pagination(&self) -> Pagination {
    let limit = u64::from(self.page.limit);
    Pagination {
      total:       self.total,
      page:        self.page.page,
      limit:       self.page.limit,
      total_pages: self.total.div_ceil(limit),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub total:       u64,
  pub page:        u32,
  pub limit:       u32,
  pub total_pages: u64,
}

// ─── Sorting ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
  Asc,
  #[default]
  Desc,
}

impl SortOrder {
  /// `"asc"` (any case) is ascending; anything else is the default.
  pub fn parse_or_default(raw: Option<&str>) -> Self {
    match raw {
      Some(s) if s.trim().eq_ignore_ascii_case("asc") => Self::Asc,
      _ => Self::Desc,
    }
  }
}

/// Sortable alert columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlertSort {
  #[default]
  Timestamp,
  Title,
  Severity,
}

impl AlertSort {
  /// Unknown sort keys fall back to the timestamp.
  pub fn parse_or_default(raw: Option<&str>) -> Self {
    match raw.map(str::trim) {
      Some("title") => Self::Title,
      Some("severity") => Self::Severity,
      _ => Self::Timestamp,
    }
  }
}

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::SafetyStore::search_alerts`].
#[derive(Debug, Clone, Default)]
pub struct AlertQuery {
  pub severity: Option<Severity>,
  /// Case-insensitive substring over title and message.
  pub search:   Option<String>,
  pub sort:     AlertSort,
  pub order:    SortOrder,
  pub page:     PageRequest,
}

/// Parameters for [`crate::store::SafetyStore::search_tips`].
#[derive(Debug, Clone, Default)]
pub struct TipQuery {
  pub category:       Option<TipCategory>,
  pub search:         Option<String>,
  pub created_after:  Option<DateTime<Utc>>,
  pub created_before: Option<DateTime<Utc>>,
  pub page:           PageRequest,
}

/// Parameters for [`crate::store::SafetyStore::list_contacts`].
#[derive(Debug, Clone, Default)]
pub struct ContactQuery {
  pub contact_type:   Option<ContactType>,
  pub available_only: bool,
}

/// Parameters for [`crate::store::SafetyStore::list_requests`].
#[derive(Debug, Clone)]
pub struct RequestQuery {
  pub kind:           RequestKind,
  pub status:         Option<RequestStatus>,
  pub created_after:  Option<DateTime<Utc>>,
  pub created_before: Option<DateTime<Utc>>,
  /// Substring over id, location and description.
  pub search:         Option<String>,
  /// `Desc` lists newest first.
  pub order:          SortOrder,
}

impl RequestQuery {
  pub fn new(kind: RequestKind) -> Self {
    Self {
      kind,
      status: None,
      created_after: None,
      created_before: None,
      search: None,
      order: SortOrder::Desc,
    }
  }
}
