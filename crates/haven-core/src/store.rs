//! The `SafetyStore` trait.
//!
//! Implemented by storage backends (e.g. `haven-store-sqlite`). The HTTP
//! layer (`haven-api`) depends on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  alert::{Alert, NewAlert},
  contact::{Contact, ContactPatch, NewContact},
  guide::{Guide, NewGuide},
  option::{AssistanceOption, NewOption, OptionPatch},
  query::{AlertQuery, ContactQuery, Page, RequestQuery, TipQuery},
  request::{AssistanceRequest, NewRequest, RequestView, StatusChange},
  sos::SosAlert,
  tip::{NewTip, Tip, TipCategory},
  user::{AuthUser, Credentials, NewUser, ProfileUpdate},
};

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
  /// SOS requests that are not yet resolved.
  pub active_sos_count:         u64,
  pub pending_assistance_count: u64,
}

/// Abstraction over a Haven storage backend.
///
/// Soft-deletable rows (alerts, tips, guides, contacts) are never physically
/// removed; "delete" stamps `deleted_at` and every list operation skips
/// stamped rows. Operations addressed by id return `None` when the row does
/// not exist (or is already deleted).
///
/// All methods return `Send` futures so the trait can be used behind axum.
pub trait SafetyStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Emergency alerts ──────────────────────────────────────────────────

  fn create_alert(
    &self,
    input: NewAlert,
  ) -> impl Future<Output = Result<Alert, Self::Error>> + Send + '_;

  /// All live alerts, newest first.
  fn list_alerts(&self) -> impl Future<Output = Result<Vec<Alert>, Self::Error>> + Send + '_;

  /// Filtered, sorted and paginated live alerts.
  fn search_alerts(
    &self,
    query: AlertQuery,
  ) -> impl Future<Output = Result<Page<Alert>, Self::Error>> + Send + '_;

  fn delete_alert(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Alert>, Self::Error>> + Send + '_;

  // ── Wellbeing tips ────────────────────────────────────────────────────

  fn create_tip(
    &self,
    input: NewTip,
  ) -> impl Future<Output = Result<Tip, Self::Error>> + Send + '_;

  /// A random live tip that is unscheduled or scheduled at or before `now`.
  fn random_tip(
    &self,
    category: Option<TipCategory>,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<Tip>, Self::Error>> + Send + '_;

  fn search_tips(
    &self,
    query: TipQuery,
  ) -> impl Future<Output = Result<Page<Tip>, Self::Error>> + Send + '_;

  fn delete_tip(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Tip>, Self::Error>> + Send + '_;

  // ── First-aid guides ──────────────────────────────────────────────────

  fn create_guide(
    &self,
    input: NewGuide,
  ) -> impl Future<Output = Result<Guide, Self::Error>> + Send + '_;

  /// Live guides ordered by category, then title.
  fn list_guides(&self) -> impl Future<Output = Result<Vec<Guide>, Self::Error>> + Send + '_;

  fn delete_guide(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Guide>, Self::Error>> + Send + '_;

  // ── Emergency contacts ────────────────────────────────────────────────

  fn create_contact(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Live contacts ordered by `sort_order`, then name.
  fn list_contacts(
    &self,
    query: ContactQuery,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  fn update_contact(
    &self,
    id: i64,
    patch: ContactPatch,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  fn delete_contact(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  // ── Assistance options ────────────────────────────────────────────────

  fn create_option(
    &self,
    input: NewOption,
  ) -> impl Future<Output = Result<AssistanceOption, Self::Error>> + Send + '_;

  /// Active options ordered by `sort_order`.
  fn list_options(
    &self,
  ) -> impl Future<Output = Result<Vec<AssistanceOption>, Self::Error>> + Send + '_;

  fn update_option(
    &self,
    id: i64,
    patch: OptionPatch,
  ) -> impl Future<Output = Result<Option<AssistanceOption>, Self::Error>> + Send + '_;

  /// Clear `is_active`; options are never deleted.
  fn deactivate_option(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<AssistanceOption>, Self::Error>> + Send + '_;

  // ── Assistance requests ───────────────────────────────────────────────

  /// Persist a request. SOS requests also get an active [`SosAlert`] linked
  /// by `request_id`; both rows are written in one transaction.
  fn create_request(
    &self,
    input: NewRequest,
  ) -> impl Future<Output = Result<AssistanceRequest, Self::Error>> + Send + '_;

  /// Apply a status transition (see [`StatusChange::stamps`]). Resolving an
  /// SOS request resolves its linked alert in the same transaction.
  fn update_request_status(
    &self,
    change: StatusChange,
  ) -> impl Future<Output = Result<Option<AssistanceRequest>, Self::Error>> + Send + '_;

  fn list_requests(
    &self,
    query: RequestQuery,
  ) -> impl Future<Output = Result<Vec<RequestView>, Self::Error>> + Send + '_;

  /// Every request not yet resolved, newest first.
  fn active_requests(
    &self,
  ) -> impl Future<Output = Result<Vec<RequestView>, Self::Error>> + Send + '_;

  /// Pending SOS requests created after `since`, newest first.
  fn recent_sos_requests(
    &self,
    since: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<RequestView>, Self::Error>> + Send + '_;

  fn dashboard_stats(
    &self,
  ) -> impl Future<Output = Result<DashboardStats, Self::Error>> + Send + '_;

  // ── SOS alerts ────────────────────────────────────────────────────────

  /// Record a bare SOS press by `user_id` and broadcast a high-severity
  /// emergency alert, in one transaction.
  fn raise_sos(
    &self,
    user_id: i64,
  ) -> impl Future<Output = Result<SosAlert, Self::Error>> + Send + '_;

  fn get_sos_alert(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<SosAlert>, Self::Error>> + Send + '_;

  /// Resolve an SOS alert and, when linked, its request.
  fn resolve_sos_alert(
    &self,
    id: i64,
    actor: i64,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<SosAlert>, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<AuthUser, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<AuthUser>, Self::Error>> + Send + '_;

  /// Look up a live user by email (case-insensitive) for authentication.
  fn find_credentials(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + '_;

  /// Overwrite the profile fields and mark the profile complete.
  fn update_profile(
    &self,
    id: i64,
    update: ProfileUpdate,
  ) -> impl Future<Output = Result<Option<AuthUser>, Self::Error>> + Send + '_;
}
