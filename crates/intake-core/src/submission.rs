//! Contact-form submissions.
//!
//! A [`NewSubmission`] is what a client sends; a [`Submission`] is what the
//! server stores. Identity and creation time only exist on the latter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Status assigned to every freshly created submission.
pub const STATUS_NEW: &str = "new";

/// A stored contact-form entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
  pub id:            Uuid,
  pub name:          String,
  pub company:       Option<String>,
  pub email:         String,
  pub phone:         Option<String>,
  #[serde(rename = "projectBrief")]
  pub project_brief: String,
  pub timestamp:     DateTime<Utc>,
  pub status:        String,
}

impl Submission {
  /// Build a stored record from validated input. `id` is generated here.
  pub fn new(input: NewSubmission, timestamp: DateTime<Utc>) -> Self {
    Submission {
      id: Uuid::new_v4(),
      name: input.name,
      company: input.company,
      email: input.email,
      phone: input.phone,
      project_brief: input.project_brief,
      timestamp,
      status: STATUS_NEW.to_owned(),
    }
  }
}

/// Client-supplied submission body. Unknown fields (including any `id` or
/// `timestamp`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSubmission {
  pub name:          String,
  #[serde(default)]
  pub company:       Option<String>,
  pub email:         String,
  #[serde(default)]
  pub phone:         Option<String>,
  #[serde(rename = "projectBrief")]
  pub project_brief: String,
}

impl NewSubmission {
  /// Check required fields and normalise whitespace.
  ///
  /// Required fields are trimmed and must be non-empty. Blank optional
  /// fields become `None`.
  pub fn validate(self) -> Result<Self> {
    Ok(NewSubmission {
      name:          required("name", self.name)?,
      company:       optional(self.company),
      email:         required("email", self.email)?,
      phone:         optional(self.phone),
      project_brief: required("projectBrief", self.project_brief)?,
    })
  }

  /// Key used for per-sender rate limiting.
  pub fn rate_limit_key(&self) -> String { self.email.trim().to_lowercase() }
}

fn required(field: &'static str, value: String) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::MissingField(field));
  }
  Ok(trimmed.to_owned())
}

fn optional(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}
