//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, Utc};
use haven_core::{
  alert::{NewAlert, Severity},
  contact::{ContactPatch, ContactType, NewContact},
  guide::{GuideStep, NewGuide},
  option::{NewOption, OptionPatch, Urgency},
  query::{AlertQuery, AlertSort, ContactQuery, PageRequest, RequestQuery, SortOrder, TipQuery},
  request::{NewRequest, RequestKind, RequestStatus, StatusChange},
  sos::SosStatus,
  store::SafetyStore,
  tip::{NewTip, TipCategory},
  user::{NewUser, ProfileUpdate, UserType},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, email: &str, name: &str) -> i64 {
  s.create_user(NewUser {
    email:         email.into(),
    name:          Some(name.into()),
    is_admin:      false,
    password_hash: "not-a-real-hash".into(),
  })
  .await
  .unwrap()
  .id
}

fn alert(title: &str, message: &str, severity: &str) -> NewAlert {
  NewAlert::parse(Some(title.into()), Some(message.into()), Some(severity)).unwrap()
}

// ─── Alerts ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_alert_round_trips_fields() {
  let s = store().await;
  let a = s.create_alert(alert("Drill", "Fire drill at 10", "medium")).await.unwrap();
  assert_eq!(a.title, "Drill");
  assert_eq!(a.message, "Fire drill at 10");
  assert_eq!(a.severity, Severity::Medium);
  assert!(a.deleted_at.is_none());
}

#[tokio::test]
async fn deleted_alerts_disappear_from_lists() {
  let s = store().await;
  let keep = s.create_alert(alert("Keep", "visible", "low")).await.unwrap();
  let gone = s.create_alert(alert("Gone", "hidden", "low")).await.unwrap();

  let deleted = s.delete_alert(gone.id).await.unwrap().unwrap();
  assert!(deleted.deleted_at.is_some());

  let list = s.list_alerts().await.unwrap();
  assert_eq!(list.len(), 1);
  assert_eq!(list[0].id, keep.id);

  let page = s.search_alerts(AlertQuery::default()).await.unwrap();
  assert_eq!(page.total, 1);

  // A second delete finds nothing live.
  assert!(s.delete_alert(gone.id).await.unwrap().is_none());
}

#[tokio::test]
async fn list_alerts_newest_first() {
  let s = store().await;
  let first = s.create_alert(alert("First", "m", "low")).await.unwrap();
  let second = s.create_alert(alert("Second", "m", "low")).await.unwrap();
  let ids: Vec<_> = s.list_alerts().await.unwrap().iter().map(|a| a.id).collect();
  assert_eq!(ids, vec![second.id, first.id]);
}

#[tokio::test]
async fn search_alerts_filters_sorts_and_pages() {
  let s = store().await;
  s.create_alert(alert("Gas leak", "Evacuate block B", "high")).await.unwrap();
  s.create_alert(alert("Assembly", "Hall at 9", "low")).await.unwrap();
  s.create_alert(alert("Flood", "Basement closed; gas off", "medium")).await.unwrap();

  let by_text = s
    .search_alerts(AlertQuery { search: Some("GAS".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(by_text.total, 2);

  let high = s
    .search_alerts(AlertQuery { severity: Some(Severity::High), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(high.items.len(), 1);
  assert_eq!(high.items[0].title, "Gas leak");

  let by_severity = s
    .search_alerts(AlertQuery {
      sort: AlertSort::Severity,
      order: SortOrder::Desc,
      ..Default::default()
    })
    .await
    .unwrap();
  let severities: Vec<_> = by_severity.items.iter().map(|a| a.severity).collect();
  assert_eq!(severities, vec![Severity::High, Severity::Medium, Severity::Low]);

  let page_two = s
    .search_alerts(AlertQuery {
      sort: AlertSort::Title,
      order: SortOrder::Asc,
      page: PageRequest::new(Some(2), Some(2)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page_two.total, 3);
  assert_eq!(page_two.items.len(), 1);
  assert_eq!(page_two.items[0].title, "Gas leak");
  assert_eq!(page_two.pagination().total_pages, 2);
}

#[tokio::test]
async fn search_treats_like_wildcards_literally() {
  let s = store().await;
  s.create_alert(alert("Sale", "50% off lunch", "low")).await.unwrap();
  s.create_alert(alert("Other", "500 students", "low")).await.unwrap();

  let page = s
    .search_alerts(AlertQuery { search: Some("50%".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(page.total, 1);
  assert_eq!(page.items[0].title, "Sale");
}

#[tokio::test]
async fn search_folds_non_ascii_case() {
  let s = store().await;
  s.create_alert(alert("ÉVACUATION", "Quittez le bâtiment", "high")).await.unwrap();
  s.create_alert(alert("Drill", "Fire drill at 10", "low")).await.unwrap();

  let page = s
    .search_alerts(AlertQuery { search: Some("évacuation".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(page.total, 1);
  assert_eq!(page.items[0].title, "ÉVACUATION");

  let page = s
    .search_alerts(AlertQuery { search: Some("BÂTIMENT".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(page.total, 1);

  s.create_tip(NewTip::parse(Some("Überprüfe deinen Schlaf".into()), Some("physical"), None).unwrap())
    .await
    .unwrap();
  let tips = s
    .search_tips(TipQuery { search: Some("überprüfe".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(tips.total, 1);
}

// ─── Tips ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_tip_stores_lowercase_category() {
  let s = store().await;
  let input = NewTip::parse(Some("Drink water".into()), Some("Physical"), None).unwrap();
  let tip = s.create_tip(input).await.unwrap();
  assert_eq!(tip.category, TipCategory::Physical);
  assert_eq!(tip.category.to_string(), "physical");
  assert!(tip.deleted_at.is_none());
}

#[tokio::test]
async fn random_tip_skips_future_and_deleted_tips() {
  let s = store().await;
  let now = Utc::now();

  assert!(s.random_tip(None, now).await.unwrap().is_none());

  let future = NewTip {
    tip:           "Not yet".into(),
    category:      TipCategory::Mental,
    scheduled_for: Some(now + Duration::days(3)),
  };
  s.create_tip(future).await.unwrap();
  assert!(s.random_tip(None, now).await.unwrap().is_none());

  let due = NewTip {
    tip:           "Breathe".into(),
    category:      TipCategory::Mental,
    scheduled_for: Some(now - Duration::hours(1)),
  };
  let due = s.create_tip(due).await.unwrap();
  let picked = s.random_tip(Some(TipCategory::Mental), now).await.unwrap().unwrap();
  assert_eq!(picked.id, due.id);

  assert!(s.random_tip(Some(TipCategory::Social), now).await.unwrap().is_none());

  s.delete_tip(due.id).await.unwrap();
  assert!(s.random_tip(None, now).await.unwrap().is_none());
}

#[tokio::test]
async fn search_tips_by_category_and_date() {
  let s = store().await;
  for (text, cat) in [("Walk", "physical"), ("Stretch", "physical"), ("Call a friend", "social")] {
    s.create_tip(NewTip::parse(Some(text.into()), Some(cat), None).unwrap())
      .await
      .unwrap();
  }

  let physical = s
    .search_tips(TipQuery { category: Some(TipCategory::Physical), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(physical.total, 2);

  let future_only = s
    .search_tips(TipQuery {
      created_after: Some(Utc::now() + Duration::days(1)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(future_only.total, 0);

  let searched = s
    .search_tips(TipQuery { search: Some("friend".into()), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(searched.items.len(), 1);
}

// ─── Guides ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn guides_keep_steps_and_sort_by_category() {
  let s = store().await;
  let author = user(&s, "nurse@school.edu", "Nurse").await;

  let mut burns = NewGuide::parse(
    Some("Burns".into()),
    Some("Cool the burn".into()),
    Some("Injuries".into()),
    None,
    vec![
      GuideStep { description: "Run cool water".into(), image_url: None },
      GuideStep {
        description: "Cover loosely".into(),
        image_url:   Some("https://img/cover.png".into()),
      },
    ],
  )
  .unwrap();
  burns.created_by = Some(author);
  let burns = s.create_guide(burns).await.unwrap();
  assert_eq!(burns.tag, "General");
  assert_eq!(burns.steps.len(), 2);
  assert_eq!(burns.created_by, Some(author));

  let choking = NewGuide::parse(
    Some("Choking".into()),
    Some("Back blows".into()),
    Some("Breathing".into()),
    Some("Urgent".into()),
    vec![],
  )
  .unwrap();
  s.create_guide(choking).await.unwrap();

  let titles: Vec<_> = s.list_guides().await.unwrap().into_iter().map(|g| g.title).collect();
  assert_eq!(titles, vec!["Choking", "Burns"]);

  s.delete_guide(burns.id).await.unwrap().unwrap();
  assert_eq!(s.list_guides().await.unwrap().len(), 1);
}

// ─── Contacts ────────────────────────────────────────────────────────────────

fn contact(name: &str, kind: ContactType, available: bool, sort_order: i64) -> NewContact {
  NewContact {
    name:            name.into(),
    role:            "Counselor".into(),
    phone:           "+15550001111".into(),
    email:           "help@school.edu".into(),
    description:     None,
    available_hours: None,
    contact_type:    kind,
    is_available:    available,
    sort_order,
  }
}

#[tokio::test]
async fn contacts_filter_and_order() {
  let s = store().await;
  s.create_contact(contact("Zed", ContactType::Counseling, true, 1)).await.unwrap();
  s.create_contact(contact("Amy", ContactType::Counseling, false, 1)).await.unwrap();
  s.create_contact(contact("Bob", ContactType::Medical, true, 0)).await.unwrap();

  let all = s.list_contacts(ContactQuery::default()).await.unwrap();
  let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
  assert_eq!(names, vec!["Bob", "Amy", "Zed"]);

  let counseling_available = s
    .list_contacts(ContactQuery {
      contact_type:   Some(ContactType::Counseling),
      available_only: true,
    })
    .await
    .unwrap();
  assert_eq!(counseling_available.len(), 1);
  assert_eq!(counseling_available[0].name, "Zed");
}

#[tokio::test]
async fn invalid_contact_is_rejected_and_not_stored() {
  let s = store().await;
  let mut bad = contact("Amy", ContactType::General, true, 0);
  bad.email = "not-an-email".into();
  assert!(s.create_contact(bad).await.is_err());
  assert!(s.list_contacts(ContactQuery::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_contact_patches_given_fields_only() {
  let s = store().await;
  let c = s.create_contact(contact("Amy", ContactType::General, true, 0)).await.unwrap();

  let patch = ContactPatch {
    phone: Some("+15559998888".into()),
    is_available: Some(false),
    ..Default::default()
  };
  let updated = s.update_contact(c.id, patch).await.unwrap().unwrap();
  assert_eq!(updated.phone, "+15559998888");
  assert!(!updated.is_available);
  assert_eq!(updated.name, "Amy");
  assert_eq!(updated.email, "help@school.edu");

  s.delete_contact(c.id).await.unwrap().unwrap();
  let missing = s.update_contact(c.id, ContactPatch::default()).await.unwrap();
  assert!(missing.is_none());
}

// ─── Options ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn options_update_and_deactivate() {
  let s = store().await;
  let late = s
    .create_option(NewOption::parse(Some("Lost item".into()), Some("Other"), None, Some(5)).unwrap())
    .await
    .unwrap();
  let first = s
    .create_option(
      NewOption::parse(Some("Feeling unwell".into()), Some("Student Assistance"), Some("urgent"), Some(1))
        .unwrap(),
    )
    .await
    .unwrap();

  let labels: Vec<_> = s.list_options().await.unwrap().into_iter().map(|o| o.label).collect();
  assert_eq!(labels, vec!["Feeling unwell", "Lost item"]);

  let patch = OptionPatch { urgency: Some(Urgency::Urgent), ..Default::default() };
  let updated = s.update_option(late.id, patch).await.unwrap().unwrap();
  assert_eq!(updated.urgency, Urgency::Urgent);
  assert!(updated.updated_at >= late.updated_at);

  let off = s.deactivate_option(first.id).await.unwrap().unwrap();
  assert!(!off.is_active);
  assert_eq!(s.list_options().await.unwrap().len(), 1);

  let patch = OptionPatch { label: Some("x".into()), ..Default::default() };
  assert!(s.update_option(9999, patch).await.unwrap().is_none());
}

// ─── Requests & SOS ──────────────────────────────────────────────────────────

fn sos_request(created_by: Option<i64>) -> NewRequest {
  let mut r = NewRequest::parse(Some("sos"), Some("Gym".into()), None, None, Some("urgent")).unwrap();
  r.created_by = created_by;
  r
}

fn assistance_request(description: &str) -> NewRequest {
  NewRequest::parse(Some("assistance"), None, Some(description.into()), None, None).unwrap()
}

fn change(id: i64, kind: RequestKind, status: RequestStatus, actor: i64) -> StatusChange {
  StatusChange { id, kind, status, actor, at: Utc::now() }
}

#[tokio::test]
async fn sos_request_creates_linked_alert() {
  let s = store().await;
  let student = user(&s, "kid@school.edu", "Kid").await;

  let req = s.create_request(sos_request(Some(student))).await.unwrap();
  assert_eq!(req.status, RequestStatus::Pending);
  assert_eq!(req.location, "Gym");
  assert_eq!(req.description, "Emergency Assistance Needed");

  let alert = s.get_sos_alert(1).await.unwrap().unwrap();
  assert_eq!(alert.request_id, Some(req.id));
  assert_eq!(alert.status, SosStatus::Active);
  assert_eq!(alert.created_by, Some(student));
}

#[tokio::test]
async fn assistance_request_creates_no_alert() {
  let s = store().await;
  s.create_request(assistance_request("Need a plaster")).await.unwrap();
  assert!(s.get_sos_alert(1).await.unwrap().is_none());
}

#[tokio::test]
async fn resolving_sos_request_resolves_alert() {
  let s = store().await;
  let teacher = user(&s, "t@school.edu", "Teacher").await;
  let req = s.create_request(sos_request(None)).await.unwrap();

  let resolved = s
    .update_request_status(change(req.id, RequestKind::Sos, RequestStatus::Resolved, teacher))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(resolved.status, RequestStatus::Resolved);
  assert_eq!(resolved.resolved_by, Some(teacher));
  assert!(resolved.resolved_at.unwrap() >= resolved.created_at);
  assert!(resolved.acknowledged_at.is_none());

  let alert = s.get_sos_alert(1).await.unwrap().unwrap();
  assert_eq!(alert.status, SosStatus::Resolved);
  assert_eq!(alert.resolved_by, Some(teacher));
}

#[tokio::test]
async fn reopening_sos_request_reactivates_alert() {
  let s = store().await;
  let teacher = user(&s, "t@school.edu", "Teacher").await;
  let req = s.create_request(sos_request(None)).await.unwrap();

  s.update_request_status(change(req.id, RequestKind::Sos, RequestStatus::Resolved, teacher))
    .await
    .unwrap()
    .unwrap();
  s.update_request_status(change(req.id, RequestKind::Sos, RequestStatus::Pending, teacher))
    .await
    .unwrap()
    .unwrap();

  let alert = s.get_sos_alert(1).await.unwrap().unwrap();
  assert_eq!(alert.status, SosStatus::Active);
  assert!(alert.resolved_by.is_none());
  assert!(alert.resolved_at.is_none());

  // Resolving again reaches the alert.
  s.update_request_status(change(req.id, RequestKind::Sos, RequestStatus::Resolved, teacher))
    .await
    .unwrap()
    .unwrap();
  let alert = s.get_sos_alert(1).await.unwrap().unwrap();
  assert_eq!(alert.status, SosStatus::Resolved);
  assert_eq!(alert.resolved_by, Some(teacher));
}

#[tokio::test]
async fn status_lifecycle_stamps_and_clears() {
  let s = store().await;
  let teacher = user(&s, "t@school.edu", "Teacher").await;
  let req = s.create_request(assistance_request("Help")).await.unwrap();

  let acked = s
    .update_request_status(change(req.id, RequestKind::Assistance, RequestStatus::Acknowledged, teacher))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(acked.acknowledged_by, Some(teacher));
  assert!(acked.acknowledged_at.is_some());

  let resolved = s
    .update_request_status(change(req.id, RequestKind::Assistance, RequestStatus::Resolved, teacher))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(resolved.acknowledged_at, acked.acknowledged_at);
  assert_eq!(resolved.resolved_by, Some(teacher));

  let reopened = s
    .update_request_status(change(req.id, RequestKind::Assistance, RequestStatus::Pending, teacher))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(reopened.status, RequestStatus::Pending);
  assert!(reopened.acknowledged_by.is_none());
  assert!(reopened.resolved_at.is_none());
}

#[tokio::test]
async fn status_update_requires_matching_type() {
  let s = store().await;
  let req = s.create_request(assistance_request("Help")).await.unwrap();
  let wrong = s
    .update_request_status(change(req.id, RequestKind::Sos, RequestStatus::Resolved, 1))
    .await
    .unwrap();
  assert!(wrong.is_none());

  let missing = s
    .update_request_status(change(404, RequestKind::Assistance, RequestStatus::Resolved, 1))
    .await
    .unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn views_carry_user_names() {
  let s = store().await;
  let student = user(&s, "kid@school.edu", "Kid").await;
  let teacher = user(&s, "t@school.edu", "Ms Ray").await;
  let req = s.create_request(sos_request(Some(student))).await.unwrap();
  s.update_request_status(change(req.id, RequestKind::Sos, RequestStatus::Acknowledged, teacher))
    .await
    .unwrap();

  let active = s.active_requests().await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].created_by_name.as_deref(), Some("Kid"));
  assert_eq!(active[0].acknowledged_by_name.as_deref(), Some("Ms Ray"));
  assert!(active[0].resolved_by_name.is_none());
}

#[tokio::test]
async fn list_requests_filters() {
  let s = store().await;
  let staff = user(&s, "staff@school.edu", "Staff").await;
  let a = s.create_request(assistance_request("Broken window")).await.unwrap();
  let b = s.create_request(assistance_request("Lost bag")).await.unwrap();
  s.create_request(sos_request(None)).await.unwrap();
  s.update_request_status(change(b.id, RequestKind::Assistance, RequestStatus::Resolved, staff))
    .await
    .unwrap();

  let all = s.list_requests(RequestQuery::new(RequestKind::Assistance)).await.unwrap();
  let ids: Vec<_> = all.iter().map(|v| v.request.id).collect();
  assert_eq!(ids, vec![b.id, a.id]);

  let mut oldest = RequestQuery::new(RequestKind::Assistance);
  oldest.order = SortOrder::Asc;
  let ids: Vec<_> = s.list_requests(oldest).await.unwrap().iter().map(|v| v.request.id).collect();
  assert_eq!(ids, vec![a.id, b.id]);

  let mut pending = RequestQuery::new(RequestKind::Assistance);
  pending.status = Some(RequestStatus::Pending);
  assert_eq!(s.list_requests(pending).await.unwrap().len(), 1);

  let mut search = RequestQuery::new(RequestKind::Assistance);
  search.search = Some("window".into());
  let found = s.list_requests(search).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].request.id, a.id);

  let mut tomorrow = RequestQuery::new(RequestKind::Assistance);
  tomorrow.created_after = Some(Utc::now() + Duration::days(1));
  assert!(s.list_requests(tomorrow).await.unwrap().is_empty());
}

#[tokio::test]
async fn recent_sos_and_dashboard_counts() {
  let s = store().await;
  let staff = user(&s, "staff@school.edu", "Staff").await;
  let first = s.create_request(sos_request(None)).await.unwrap();
  s.create_request(sos_request(None)).await.unwrap();
  s.create_request(assistance_request("Help")).await.unwrap();

  let since = Utc::now() - Duration::hours(24);
  assert_eq!(s.recent_sos_requests(since).await.unwrap().len(), 2);

  s.update_request_status(change(first.id, RequestKind::Sos, RequestStatus::Acknowledged, staff))
    .await
    .unwrap();
  assert_eq!(s.recent_sos_requests(since).await.unwrap().len(), 1);

  let stats = s.dashboard_stats().await.unwrap();
  assert_eq!(stats.active_sos_count, 2);
  assert_eq!(stats.pending_assistance_count, 1);
}

#[tokio::test]
async fn raise_sos_broadcasts_alert() {
  let s = store().await;
  let kid = user(&s, "kid@school.edu", "Kid").await;

  let sos = s.raise_sos(kid).await.unwrap();
  assert_eq!(sos.status, SosStatus::Active);
  assert_eq!(sos.created_by, Some(kid));
  assert!(sos.request_id.is_none());

  let alerts = s.list_alerts().await.unwrap();
  assert_eq!(alerts.len(), 1);
  assert_eq!(alerts[0].title, "SOS ALERT");
  assert_eq!(alerts[0].severity, Severity::High);
}

#[tokio::test]
async fn resolve_sos_alert_resolves_linked_request() {
  let s = store().await;
  let teacher = user(&s, "t@school.edu", "Teacher").await;
  let req = s.create_request(sos_request(None)).await.unwrap();

  let alert = s.resolve_sos_alert(1, teacher, Utc::now()).await.unwrap().unwrap();
  assert_eq!(alert.status, SosStatus::Resolved);

  let views = s.list_requests(RequestQuery::new(RequestKind::Sos)).await.unwrap();
  assert_eq!(views[0].request.id, req.id);
  assert_eq!(views[0].request.status, RequestStatus::Resolved);
  assert_eq!(views[0].resolved_by_name.as_deref(), Some("Teacher"));

  assert!(s.resolve_sos_alert(99, teacher, Utc::now()).await.unwrap().is_none());
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn credentials_lookup_is_case_insensitive() {
  let s = store().await;
  let id = user(&s, "Admin@School.edu", "Admin").await;

  let creds = s.find_credentials("admin@school.edu".into()).await.unwrap().unwrap();
  assert_eq!(creds.user.id, id);
  assert_eq!(creds.password_hash, "not-a-real-hash");

  assert!(s.find_credentials("nobody@school.edu".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  user(&s, "a@school.edu", "A").await;
  let again = s
    .create_user(NewUser {
      email:         "A@school.edu".into(),
      name:          None,
      is_admin:      true,
      password_hash: "h".into(),
    })
    .await;
  assert!(again.is_err());
}

#[tokio::test]
async fn update_profile_completes_profile() {
  let s = store().await;
  let id = user(&s, "kid@school.edu", "Kid").await;
  assert!(!s.get_user(id).await.unwrap().unwrap().has_completed_profile);

  let update =
    ProfileUpdate::parse(Some("Kid Smith".into()), Some("student"), Some("9".into()), None).unwrap();
  let updated = s.update_profile(id, update).await.unwrap().unwrap();
  assert_eq!(updated.name.as_deref(), Some("Kid Smith"));
  assert_eq!(updated.user_type, Some(UserType::Student));
  assert_eq!(updated.grade.as_deref(), Some("9"));
  assert!(updated.has_completed_profile);
}
