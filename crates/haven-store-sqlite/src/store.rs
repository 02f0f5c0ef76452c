//! [`SqliteStore`] — the SQLite implementation of [`SafetyStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, Row, params, params_from_iter, types::Value};

use haven_core::{
  alert::{Alert, NewAlert},
  contact::{Contact, ContactPatch, NewContact},
  guide::{Guide, NewGuide},
  option::{AssistanceOption, NewOption, OptionPatch},
  query::{
    AlertQuery, AlertSort, ContactQuery, Page, PageRequest, RequestQuery, SortOrder, TipQuery,
  },
  request::{
    AssistanceRequest, NewRequest, RequestKind, RequestStatus, RequestView, Stamp,
    StatusChange,
  },
  sos::{SosAlert, SosStatus},
  store::{DashboardStats, SafetyStore},
  tip::{NewTip, Tip, TipCategory},
  user::{AuthUser, Credentials, NewUser, ProfileUpdate},
};

use crate::{
  Result,
  encode::{
    ALERT_COLUMNS, CONTACT_COLUMNS, GUIDE_COLUMNS, OPTION_COLUMNS, REQUEST_COLUMNS,
    REQUEST_VIEW_COLUMNS, REQUEST_VIEW_FROM, RawAlert, RawContact, RawGuide, RawOption,
    RawRequest, RawRequestView, RawSosAlert, RawTip, RawUser, SOS_COLUMNS, TIP_COLUMNS,
    USER_COLUMNS, encode_dt,
  },
  filter::{Filter, register_functions},
  schema::SCHEMA,
};

// ─── Query helpers ───────────────────────────────────────────────────────────
//
// These run on the connection thread and return raw rows; decoding into
// domain types happens back on the async side.

fn select_all<T>(
  conn: &rusqlite::Connection,
  columns: &str,
  from: &str,
  filter: Filter,
  order_by: &str,
  map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<Vec<T>> {
  let sql = format!(
    "SELECT {columns} FROM {from}{} ORDER BY {order_by}",
    filter.where_clause()
  );
  let params = filter.into_params();
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(params_from_iter(params.iter()), map)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// Like [`select_all`], but returns one page plus the unpaged row count.
fn select_page<T>(
  conn: &rusqlite::Connection,
  columns: &str,
  from: &str,
  filter: Filter,
  order_by: &str,
  page: PageRequest,
  map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
) -> rusqlite::Result<(u64, Vec<T>)> {
  let where_clause = filter.where_clause();
  let n = filter.param_count();
  let mut params = filter.into_params();

  let total: i64 = conn.query_row(
    &format!("SELECT COUNT(*) FROM {from}{where_clause}"),
    params_from_iter(params.iter()),
    |r| r.get(0),
  )?;

  params.push(Value::Integer(i64::from(page.limit)));
  params.push(Value::Integer(page.offset() as i64));
  let sql = format!(
    "SELECT {columns} FROM {from}{where_clause} ORDER BY {order_by} LIMIT ?{} OFFSET ?{}",
    n + 1,
    n + 2,
  );
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(params_from_iter(params.iter()), map)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok((total as u64, rows))
}

/// `SET` assignments for one `(actor, timestamp)` column pair, or `None`
/// when the pair is left alone.
fn stamp_assignments(
  by_column: &str,
  at_column: &str,
  stamp: Stamp,
  params: &mut Vec<Value>,
) -> Option<String> {
  match stamp {
    Stamp::Set { by, at } => {
      params.push(Value::Integer(by));
      let by_p = params.len();
      params.push(Value::Text(encode_dt(at)));
      let at_p = params.len();
      Some(format!("{by_column} = ?{by_p}, {at_column} = ?{at_p}"))
    }
    Stamp::Clear => Some(format!("{by_column} = NULL, {at_column} = NULL")),
    Stamp::Keep => None,
  }
}

fn sort_direction(order: SortOrder) -> &'static str {
  match order {
    SortOrder::Asc => "ASC",
    SortOrder::Desc => "DESC",
  }
}

fn decode_page<R, T>(
  (total, raws): (u64, Vec<R>),
  page: PageRequest,
  decode: impl Fn(R) -> Result<T>,
) -> Result<Page<T>> {
  let items = raws.into_iter().map(decode).collect::<Result<_>>()?;
  Ok(Page { items, total, page })
}

fn request_view_filter(kind: Option<RequestKind>) -> Filter {
  Filter::new().eq_opt("r.type", kind.map(|k| k.to_string()))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Haven store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        register_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn request_views(
    &self,
    filter: Filter,
    order_by: &'static str,
  ) -> Result<Vec<RequestView>> {
    let raws = self
      .conn
      .call(move |conn| {
        Ok(select_all(
          conn,
          REQUEST_VIEW_COLUMNS,
          REQUEST_VIEW_FROM,
          filter,
          order_by,
          RawRequestView::from_row,
        )?)
      })
      .await?;

    raws.into_iter().map(RawRequestView::into_view).collect()
  }

  /// Stamp `deleted_at` on a live row of `table`, returning it.
  async fn soft_delete<R: Send + 'static>(
    &self,
    table: &'static str,
    columns: &'static str,
    id: i64,
    map: fn(&Row<'_>) -> rusqlite::Result<R>,
  ) -> Result<Option<R>> {
    let now = encode_dt(Utc::now());

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                &format!(
                  "UPDATE {table} SET deleted_at = ?1
                   WHERE id = ?2 AND deleted_at IS NULL
                   RETURNING {columns}"
                ),
                params![now, id],
                map,
              )
              .optional()?,
          )
        })
        .await?,
    )
  }
}

// ─── SafetyStore impl ────────────────────────────────────────────────────────

impl SafetyStore for SqliteStore {
  type Error = crate::Error;

  // ── Emergency alerts ──────────────────────────────────────────────────────

  async fn create_alert(&self, input: NewAlert) -> Result<Alert> {
    let at       = encode_dt(Utc::now());
    let severity = input.severity.to_string();

    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO emergency_alerts (title, message, severity, timestamp)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {ALERT_COLUMNS}"
          ),
          params![input.title, input.message, severity, at],
          RawAlert::from_row,
        )?)
      })
      .await?;

    raw.into_alert()
  }

  async fn list_alerts(&self) -> Result<Vec<Alert>> {
    let raws = self
      .conn
      .call(|conn| {
        Ok(select_all(
          conn,
          ALERT_COLUMNS,
          "emergency_alerts",
          Filter::new().raw("deleted_at IS NULL"),
          "timestamp DESC, id DESC",
          RawAlert::from_row,
        )?)
      })
      .await?;

    raws.into_iter().map(RawAlert::into_alert).collect()
  }

  async fn search_alerts(&self, query: AlertQuery) -> Result<Page<Alert>> {
    let filter = Filter::new()
      .raw("deleted_at IS NULL")
      .eq_opt("severity", query.severity.map(|s| s.to_string()))
      .contains_opt(&["title", "message"], query.search.as_deref());

    let dir = sort_direction(query.order);
    let order_by = match query.sort {
      AlertSort::Timestamp => format!("timestamp {dir}, id {dir}"),
      AlertSort::Title => format!("title COLLATE NOCASE {dir}, id {dir}"),
      AlertSort::Severity => format!(
        "CASE severity WHEN 'high' THEN 3 WHEN 'medium' THEN 2 ELSE 1 END {dir}, \
         timestamp DESC"
      ),
    };
    let page = query.page;

    let rows = self
      .conn
      .call(move |conn| {
        Ok(select_page(
          conn,
          ALERT_COLUMNS,
          "emergency_alerts",
          filter,
          &order_by,
          page,
          RawAlert::from_row,
        )?)
      })
      .await?;

    decode_page(rows, page, RawAlert::into_alert)
  }

  async fn delete_alert(&self, id: i64) -> Result<Option<Alert>> {
    self
      .soft_delete("emergency_alerts", ALERT_COLUMNS, id, RawAlert::from_row)
      .await?
      .map(RawAlert::into_alert)
      .transpose()
  }

  // ── Wellbeing tips ────────────────────────────────────────────────────────

  async fn create_tip(&self, input: NewTip) -> Result<Tip> {
    let category      = input.category.to_string();
    let scheduled_for = input.scheduled_for.map(encode_dt);
    let at            = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO wellbeing_tips (tip, category, scheduled_for, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {TIP_COLUMNS}"
          ),
          params![input.tip, category, scheduled_for, at],
          RawTip::from_row,
        )?)
      })
      .await?;

    raw.into_tip()
  }

  async fn random_tip(
    &self,
    category: Option<TipCategory>,
    now: DateTime<Utc>,
  ) -> Result<Option<Tip>> {
    let filter = Filter::new()
      .raw("deleted_at IS NULL")
      .le_or_null("scheduled_for", encode_dt(now))
      .eq_opt("category", category.map(|c| c.to_string()));

    let raw = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {TIP_COLUMNS} FROM wellbeing_tips{} ORDER BY RANDOM() LIMIT 1",
          filter.where_clause()
        );
        let params = filter.into_params();
        Ok(
          conn
            .query_row(&sql, params_from_iter(params.iter()), RawTip::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawTip::into_tip).transpose()
  }

  async fn search_tips(&self, query: TipQuery) -> Result<Page<Tip>> {
    let filter = Filter::new()
      .raw("deleted_at IS NULL")
      .eq_opt("category", query.category.map(|c| c.to_string()))
      .contains_opt(&["tip"], query.search.as_deref())
      .ge_opt("created_at", query.created_after.map(encode_dt))
      .le_opt("created_at", query.created_before.map(encode_dt));
    let page = query.page;

    let rows = self
      .conn
      .call(move |conn| {
        Ok(select_page(
          conn,
          TIP_COLUMNS,
          "wellbeing_tips",
          filter,
          "created_at DESC, id DESC",
          page,
          RawTip::from_row,
        )?)
      })
      .await?;

    decode_page(rows, page, RawTip::into_tip)
  }

  async fn delete_tip(&self, id: i64) -> Result<Option<Tip>> {
    self
      .soft_delete("wellbeing_tips", TIP_COLUMNS, id, RawTip::from_row)
      .await?
      .map(RawTip::into_tip)
      .transpose()
  }

  // ── First-aid guides ──────────────────────────────────────────────────────

  async fn create_guide(&self, input: NewGuide) -> Result<Guide> {
    let steps = serde_json::to_string(&input.steps)?;
    let at    = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO first_aid_guides
               (title, content, category, tag, steps, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {GUIDE_COLUMNS}"
          ),
          params![
            input.title,
            input.content,
            input.category,
            input.tag,
            steps,
            input.created_by,
            at,
          ],
          RawGuide::from_row,
        )?)
      })
      .await?;

    raw.into_guide()
  }

  async fn list_guides(&self) -> Result<Vec<Guide>> {
    let raws = self
      .conn
      .call(|conn| {
        Ok(select_all(
          conn,
          GUIDE_COLUMNS,
          "first_aid_guides",
          Filter::new().raw("deleted_at IS NULL"),
          "category, title",
          RawGuide::from_row,
        )?)
      })
      .await?;

    raws.into_iter().map(RawGuide::into_guide).collect()
  }

  async fn delete_guide(&self, id: i64) -> Result<Option<Guide>> {
    self
      .soft_delete("first_aid_guides", GUIDE_COLUMNS, id, RawGuide::from_row)
      .await?
      .map(RawGuide::into_guide)
      .transpose()
  }

  // ── Emergency contacts ────────────────────────────────────────────────────

  async fn create_contact(&self, input: NewContact) -> Result<Contact> {
    input.validate()?;
    let contact_type = input.contact_type.to_string();
    let at           = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO emergency_contacts
               (name, role, phone, email, description, available_hours,
                contact_type, is_available, sort_order, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             RETURNING {CONTACT_COLUMNS}"
          ),
          params![
            input.name.trim(),
            input.role.trim(),
            input.phone.trim(),
            input.email.trim(),
            input.description,
            input.available_hours,
            contact_type,
            input.is_available,
            input.sort_order,
            at,
          ],
          RawContact::from_row,
        )?)
      })
      .await?;

    raw.into_contact()
  }

  async fn list_contacts(&self, query: ContactQuery) -> Result<Vec<Contact>> {
    let mut filter = Filter::new()
      .raw("deleted_at IS NULL")
      .eq_opt("contact_type", query.contact_type.map(|t| t.to_string()));
    if query.available_only {
      filter = filter.raw("is_available = 1");
    }

    let raws = self
      .conn
      .call(move |conn| {
        Ok(select_all(
          conn,
          CONTACT_COLUMNS,
          "emergency_contacts",
          filter,
          "sort_order, name",
          RawContact::from_row,
        )?)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  async fn update_contact(&self, id: i64, patch: ContactPatch) -> Result<Option<Contact>> {
    patch.validate()?;
    let trimmed = |v: Option<String>| v.map(|s| s.trim().to_owned());
    let contact_type = patch.contact_type.map(|t| t.to_string());
    let name  = trimmed(patch.name);
    let role  = trimmed(patch.role);
    let phone = trimmed(patch.phone);
    let email = trimmed(patch.email);

    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE emergency_contacts SET
                   name            = COALESCE(?1, name),
                   role            = COALESCE(?2, role),
                   phone           = COALESCE(?3, phone),
                   email           = COALESCE(?4, email),
                   description     = COALESCE(?5, description),
                   available_hours = COALESCE(?6, available_hours),
                   contact_type    = COALESCE(?7, contact_type),
                   is_available    = COALESCE(?8, is_available),
                   sort_order      = COALESCE(?9, sort_order)
                 WHERE id = ?10 AND deleted_at IS NULL
                 RETURNING {CONTACT_COLUMNS}"
              ),
              params![
                name,
                role,
                phone,
                email,
                patch.description,
                patch.available_hours,
                contact_type,
                patch.is_available,
                patch.sort_order,
                id,
              ],
              RawContact::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }

  async fn delete_contact(&self, id: i64) -> Result<Option<Contact>> {
    self
      .soft_delete("emergency_contacts", CONTACT_COLUMNS, id, RawContact::from_row)
      .await?
      .map(RawContact::into_contact)
      .transpose()
  }

  // ── Assistance options ────────────────────────────────────────────────────

  async fn create_option(&self, input: NewOption) -> Result<AssistanceOption> {
    let category = input.category.to_string();
    let urgency  = input.urgency.to_string();
    let at       = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO assistance_request_options
               (label, category, urgency, sort_order, is_active, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)
             RETURNING {OPTION_COLUMNS}"
          ),
          params![input.label, category, urgency, input.sort_order, at],
          RawOption::from_row,
        )?)
      })
      .await?;

    raw.into_option()
  }

  async fn list_options(&self) -> Result<Vec<AssistanceOption>> {
    let raws = self
      .conn
      .call(|conn| {
        Ok(select_all(
          conn,
          OPTION_COLUMNS,
          "assistance_request_options",
          Filter::new().raw("is_active = 1"),
          "sort_order, id",
          RawOption::from_row,
        )?)
      })
      .await?;

    raws.into_iter().map(RawOption::into_option).collect()
  }

  async fn update_option(
    &self,
    id: i64,
    patch: OptionPatch,
  ) -> Result<Option<AssistanceOption>> {
    patch.validate()?;
    let label    = patch.label.map(|l| l.trim().to_owned());
    let category = patch.category.map(|c| c.to_string());
    let urgency  = patch.urgency.map(|u| u.to_string());
    let at       = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE assistance_request_options SET
                   label      = COALESCE(?1, label),
                   category   = COALESCE(?2, category),
                   urgency    = COALESCE(?3, urgency),
                   sort_order = COALESCE(?4, sort_order),
                   is_active  = COALESCE(?5, is_active),
                   updated_at = ?6
                 WHERE id = ?7
                 RETURNING {OPTION_COLUMNS}"
              ),
              params![label, category, urgency, patch.sort_order, patch.is_active, at, id],
              RawOption::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawOption::into_option).transpose()
  }

  async fn deactivate_option(&self, id: i64) -> Result<Option<AssistanceOption>> {
    let at = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE assistance_request_options SET is_active = 0, updated_at = ?1
                 WHERE id = ?2
                 RETURNING {OPTION_COLUMNS}"
              ),
              params![at, id],
              RawOption::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawOption::into_option).transpose()
  }

  // ── Assistance requests ───────────────────────────────────────────────────

  async fn create_request(&self, input: NewRequest) -> Result<AssistanceRequest> {
    let kind    = input.kind.to_string();
    let urgency = input.urgency.to_string();
    let is_sos  = input.kind == RequestKind::Sos;
    let at      = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx.query_row(
          &format!(
            "INSERT INTO assistance_requests
               (type, location, description, category, urgency, status, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6, ?7)
             RETURNING {REQUEST_COLUMNS}"
          ),
          params![
            kind,
            input.location,
            input.description,
            input.category,
            urgency,
            input.created_by,
            at,
          ],
          RawRequest::from_row,
        )?;

        if is_sos {
          tx.execute(
            "INSERT INTO sos_alerts (status, location, request_id, created_by, created_at)
             VALUES ('active', ?1, ?2, ?3, ?4)",
            params![input.location, raw.id(), input.created_by, at],
          )?;
        }

        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_request()
  }

  async fn update_request_status(
    &self,
    change: StatusChange,
  ) -> Result<Option<AssistanceRequest>> {
    let stamps = change.stamps();
    let mut params: Vec<Value> = vec![Value::Text(change.status.to_string())];
    let mut sets = vec!["status = ?1".to_owned()];
    sets.extend(stamp_assignments(
      "acknowledged_by",
      "acknowledged_at",
      stamps.acknowledged,
      &mut params,
    ));
    sets.extend(stamp_assignments("resolved_by", "resolved_at", stamps.resolved, &mut params));
    params.push(Value::Integer(change.id));
    let id_p = params.len();
    params.push(Value::Text(change.kind.to_string()));
    let kind_p = params.len();

    let sql = format!(
      "UPDATE assistance_requests SET {}
       WHERE id = ?{id_p} AND type = ?{kind_p}
       RETURNING {REQUEST_COLUMNS}",
      sets.join(", ")
    );
    let resolve_alert = change.resolves_sos_alert();
    let reopen_alert = change.reopens_sos_alert();
    let actor = change.actor;
    let at = encode_dt(change.at);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx
          .query_row(&sql, params_from_iter(params.iter()), RawRequest::from_row)
          .optional()?;

        if raw.is_some() && resolve_alert {
          let n = tx.execute(
            "UPDATE sos_alerts SET status = 'resolved', resolved_by = ?1, resolved_at = ?2
             WHERE request_id = ?3 AND status = 'active'",
            params![actor, at, change.id],
          )?;
          tracing::debug!(request_id = change.id, alerts = n, "resolved linked sos alerts");
        } else if raw.is_some() && reopen_alert {
          let n = tx.execute(
            "UPDATE sos_alerts SET status = 'active', resolved_by = NULL, resolved_at = NULL
             WHERE request_id = ?1 AND status = 'resolved'",
            params![change.id],
          )?;
          tracing::debug!(request_id = change.id, alerts = n, "reopened linked sos alerts");
        }

        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawRequest::into_request).transpose()
  }

  async fn list_requests(&self, query: RequestQuery) -> Result<Vec<RequestView>> {
    let filter = request_view_filter(Some(query.kind))
      .eq_opt("r.status", query.status.map(|s| s.to_string()))
      .ge_opt("r.created_at", query.created_after.map(encode_dt))
      .le_opt("r.created_at", query.created_before.map(encode_dt))
      .contains_opt(&["r.id", "r.location", "r.description"], query.search.as_deref());

    let order_by = match query.order {
      SortOrder::Asc => "r.created_at ASC, r.id ASC",
      SortOrder::Desc => "r.created_at DESC, r.id DESC",
    };
    self.request_views(filter, order_by).await
  }

  async fn active_requests(&self) -> Result<Vec<RequestView>> {
    let filter = request_view_filter(None).raw("r.status != 'resolved'");
    self.request_views(filter, "r.created_at DESC, r.id DESC").await
  }

  async fn recent_sos_requests(&self, since: DateTime<Utc>) -> Result<Vec<RequestView>> {
    let filter = request_view_filter(Some(RequestKind::Sos))
      .eq("r.status", RequestStatus::Pending.to_string())
      .ge("r.created_at", encode_dt(since));
    self.request_views(filter, "r.created_at DESC, r.id DESC").await
  }

  async fn dashboard_stats(&self) -> Result<DashboardStats> {
    let (sos, pending): (i64, i64) = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT
             (SELECT COUNT(*) FROM assistance_requests
               WHERE type = 'sos' AND status != 'resolved'),
             (SELECT COUNT(*) FROM assistance_requests
               WHERE type = 'assistance' AND status = 'pending')",
          [],
          |r| Ok((r.get(0)?, r.get(1)?)),
        )?)
      })
      .await?;

    Ok(DashboardStats {
      active_sos_count:         sos as u64,
      pending_assistance_count: pending as u64,
    })
  }

  // ── SOS alerts ────────────────────────────────────────────────────────────

  async fn raise_sos(&self, user_id: i64) -> Result<SosAlert> {
    let broadcast = NewAlert::sos_broadcast();
    let severity  = broadcast.severity.to_string();
    let status    = SosStatus::Active.to_string();
    let at        = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx.query_row(
          &format!(
            "INSERT INTO sos_alerts (status, created_by, created_at)
             VALUES (?1, ?2, ?3)
             RETURNING {SOS_COLUMNS}"
          ),
          params![status, user_id, at],
          RawSosAlert::from_row,
        )?;
        tx.execute(
          "INSERT INTO emergency_alerts (title, message, severity, timestamp)
           VALUES (?1, ?2, ?3, ?4)",
          params![broadcast.title, broadcast.message, severity, at],
        )?;
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.into_sos_alert()
  }

  async fn get_sos_alert(&self, id: i64) -> Result<Option<SosAlert>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SOS_COLUMNS} FROM sos_alerts WHERE id = ?1"),
              params![id],
              RawSosAlert::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSosAlert::into_sos_alert).transpose()
  }

  async fn resolve_sos_alert(
    &self,
    id: i64,
    actor: i64,
    at: DateTime<Utc>,
  ) -> Result<Option<SosAlert>> {
    let at = encode_dt(at);

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx
          .query_row(
            &format!(
              "UPDATE sos_alerts SET status = 'resolved', resolved_by = ?1, resolved_at = ?2
               WHERE id = ?3
               RETURNING {SOS_COLUMNS}"
            ),
            params![actor, at, id],
            RawSosAlert::from_row,
          )
          .optional()?;

        if let Some(request_id) = raw.as_ref().and_then(RawSosAlert::request_id) {
          tx.execute(
            "UPDATE assistance_requests
             SET status = 'resolved', resolved_by = ?1, resolved_at = ?2
             WHERE id = ?3",
            params![actor, at, request_id],
          )?;
        }

        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawSosAlert::into_sos_alert).transpose()
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<AuthUser> {
    input.validate()?;
    let email = input.email.trim().to_owned();
    let at    = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO auth_users (email, name, password_hash, is_admin, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {USER_COLUMNS}"
          ),
          params![email, input.name, input.password_hash, input.is_admin, at],
          RawUser::from_row,
        )?)
      })
      .await?;

    raw.into_user()
  }

  async fn get_user(&self, id: i64) -> Result<Option<AuthUser>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {USER_COLUMNS} FROM auth_users WHERE id = ?1 AND deleted_at IS NULL"
              ),
              params![id],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_credentials(&self, email: String) -> Result<Option<Credentials>> {
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {USER_COLUMNS} FROM auth_users
                 WHERE email = ?1 AND deleted_at IS NULL"
              ),
              params![email.trim()],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_credentials).transpose()
  }

  async fn update_profile(&self, id: i64, update: ProfileUpdate) -> Result<Option<AuthUser>> {
    let user_type = update.user_type.to_string();

    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE auth_users SET
                   name = ?1, user_type = ?2, grade = ?3, section = ?4,
                   has_completed_profile = 1
                 WHERE id = ?5 AND deleted_at IS NULL
                 RETURNING {USER_COLUMNS}"
              ),
              params![update.name, user_type, update.grade, update.section, id],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}
