//! SQL schema for the intake SQLite store.
//!
//! One table per document collection. Executed on every open; idempotent
//! thanks to `IF NOT EXISTS`.

pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS status_checks (
    id          TEXT PRIMARY KEY,
    client_name TEXT NOT NULL,
    timestamp   TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

-- Submissions are written once and never updated or deleted here.
CREATE TABLE IF NOT EXISTS contact_submissions (
    id            TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    company       TEXT,
    email         TEXT NOT NULL,
    phone         TEXT,
    project_brief TEXT NOT NULL,
    timestamp     TEXT NOT NULL,  -- RFC 3339 UTC; server-assigned
    status        TEXT NOT NULL DEFAULT 'new'
);

CREATE INDEX IF NOT EXISTS contact_submissions_email_idx
    ON contact_submissions(email);

PRAGMA user_version = 1;
";
