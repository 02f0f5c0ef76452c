//! SQL schema for the Haven SQLite store.
//!
//! Executed once at connection startup. The schema version is recorded in
//! `PRAGMA user_version`; future migrations will be gated on that number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Timestamps are fixed-width RFC 3339 UTC strings (see `encode::encode_dt`)
/// so that string comparison in SQL is chronological.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS auth_users (
    id                    INTEGER PRIMARY KEY AUTOINCREMENT,
    email                 TEXT NOT NULL UNIQUE COLLATE NOCASE,
    name                  TEXT,
    password_hash         TEXT NOT NULL,      -- argon2 PHC string
    is_admin              INTEGER NOT NULL DEFAULT 0,
    user_type             TEXT,               -- 'student' | 'teacher' | 'staff'
    grade                 TEXT,
    section               TEXT,
    has_completed_profile INTEGER NOT NULL DEFAULT 0,
    created_at            TEXT NOT NULL,
    deleted_at            TEXT
);

CREATE TABLE IF NOT EXISTS emergency_alerts (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    title      TEXT NOT NULL,
    message    TEXT NOT NULL,
    severity   TEXT NOT NULL DEFAULT 'low'
               CHECK (severity IN ('low', 'medium', 'high')),
    timestamp  TEXT NOT NULL,
    deleted_at TEXT
);

CREATE TABLE IF NOT EXISTS wellbeing_tips (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    tip           TEXT NOT NULL,
    category      TEXT NOT NULL,              -- always lower-case
    scheduled_for TEXT,
    created_at    TEXT NOT NULL,
    deleted_at    TEXT
);

CREATE TABLE IF NOT EXISTS first_aid_guides (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    title      TEXT NOT NULL,
    content    TEXT NOT NULL,
    category   TEXT NOT NULL,
    tag        TEXT NOT NULL DEFAULT 'General',
    steps      TEXT NOT NULL DEFAULT '[]',    -- JSON array of {description, imageUrl?}
    created_by INTEGER REFERENCES auth_users(id),
    created_at TEXT NOT NULL,
    deleted_at TEXT
);

CREATE TABLE IF NOT EXISTS emergency_contacts (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL,
    role            TEXT NOT NULL,
    phone           TEXT NOT NULL,
    email           TEXT NOT NULL,
    description     TEXT,
    available_hours TEXT,
    contact_type    TEXT NOT NULL DEFAULT 'general'
                    CHECK (contact_type IN ('emergency', 'counseling', 'medical', 'general', 'crisis')),
    is_available    INTEGER NOT NULL DEFAULT 1,
    sort_order      INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL,
    deleted_at      TEXT
);

-- Options are deactivated, never deleted.
CREATE TABLE IF NOT EXISTS assistance_request_options (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    label      TEXT NOT NULL,
    category   TEXT NOT NULL,
    urgency    TEXT NOT NULL DEFAULT 'normal' CHECK (urgency IN ('urgent', 'normal')),
    sort_order INTEGER NOT NULL DEFAULT 0,
    is_active  INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS assistance_requests (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    type            TEXT NOT NULL CHECK (type IN ('sos', 'assistance')),
    location        TEXT NOT NULL,
    description     TEXT NOT NULL,
    category        TEXT,
    urgency         TEXT NOT NULL DEFAULT 'normal' CHECK (urgency IN ('urgent', 'normal')),
    status          TEXT NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'acknowledged', 'resolved')),
    created_by      INTEGER REFERENCES auth_users(id),
    acknowledged_by INTEGER REFERENCES auth_users(id),
    acknowledged_at TEXT,
    resolved_by     INTEGER REFERENCES auth_users(id),
    resolved_at     TEXT,
    created_at      TEXT NOT NULL
);

-- request_id is NULL for bare SOS presses that have no request row.
CREATE TABLE IF NOT EXISTS sos_alerts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    status      TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'resolved')),
    location    TEXT,
    request_id  INTEGER REFERENCES assistance_requests(id),
    created_by  INTEGER REFERENCES auth_users(id),
    resolved_by INTEGER REFERENCES auth_users(id),
    resolved_at TEXT,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS alerts_timestamp_idx   ON emergency_alerts(timestamp);
CREATE INDEX IF NOT EXISTS tips_created_idx       ON wellbeing_tips(created_at);
CREATE INDEX IF NOT EXISTS requests_status_idx    ON assistance_requests(type, status);
CREATE INDEX IF NOT EXISTS requests_created_idx   ON assistance_requests(created_at);
CREATE INDEX IF NOT EXISTS sos_alerts_request_idx ON sos_alerts(request_id);

PRAGMA user_version = 1;
";
