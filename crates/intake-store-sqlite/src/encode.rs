//! Conversions between domain types and the plain-text column values stored
//! in SQLite.
//!
//! Timestamps are stored as RFC 3339 strings and UUIDs as hyphenated
//! lowercase strings.

use chrono::{DateTime, Utc};
use intake_core::{status::StatusCheck, submission::Submission};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `status_checks` row.
pub struct RawStatusCheck {
  pub id:          String,
  pub client_name: String,
  pub timestamp:   String,
}

impl RawStatusCheck {
  pub fn into_status_check(self) -> Result<StatusCheck> {
    Ok(StatusCheck {
      id:          decode_uuid(&self.id)?,
      client_name: self.client_name,
      timestamp:   decode_dt(&self.timestamp)?,
    })
  }
}

/// Raw strings read directly from a `contact_submissions` row.
pub struct RawSubmission {
  pub id:            String,
  pub name:          String,
  pub company:       Option<String>,
  pub email:         String,
  pub phone:         Option<String>,
  pub project_brief: String,
  pub timestamp:     String,
  pub status:        String,
}

impl RawSubmission {
  pub fn into_submission(self) -> Result<Submission> {
    Ok(Submission {
      id:            decode_uuid(&self.id)?,
      name:          self.name,
      company:       self.company,
      email:         self.email,
      phone:         self.phone,
      project_brief: self.project_brief,
      timestamp:     decode_dt(&self.timestamp)?,
      status:        self.status,
    })
  }
}
