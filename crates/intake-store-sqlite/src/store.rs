//! [`SqliteStore`], the SQLite implementation of [`IntakeStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use intake_core::{status::StatusCheck, store::IntakeStore, submission::Submission};

use crate::{
  encode::{RawStatusCheck, RawSubmission, encode_dt, encode_uuid},
  schema::SCHEMA,
  Result,
};

const SELECT_SUBMISSION: &str = "SELECT id, name, company, email, phone, project_brief, timestamp, status
   FROM contact_submissions";

fn raw_submission(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSubmission> {
  Ok(RawSubmission {
    id:            row.get(0)?,
    name:          row.get(1)?,
    company:       row.get(2)?,
    email:         row.get(3)?,
    phone:         row.get(4)?,
    project_brief: row.get(5)?,
    timestamp:     row.get(6)?,
    status:        row.get(7)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An intake store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
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

  /// Open an in-memory store. Used by tests and `DATABASE_URL=:memory:`.
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
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── IntakeStore impl ────────────────────────────────────────────────────────

impl IntakeStore for SqliteStore {
  type Error = crate::Error;

  // ── Heartbeats ────────────────────────────────────────────────────────────

  async fn insert_status_check(&self, check: &StatusCheck) -> Result<()> {
    let id_str      = encode_uuid(check.id);
    let client_name = check.client_name.clone();
    let at_str      = encode_dt(check.timestamp);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO status_checks (id, client_name, timestamp) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, client_name, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_status_checks(&self, limit: usize) -> Result<Vec<StatusCheck>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawStatusCheck> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, client_name, timestamp FROM status_checks
           ORDER BY rowid LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit], |row| {
            Ok(RawStatusCheck {
              id:          row.get(0)?,
              client_name: row.get(1)?,
              timestamp:   row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStatusCheck::into_status_check).collect()
  }

  // ── Submissions ───────────────────────────────────────────────────────────

  async fn insert_submission(&self, submission: &Submission) -> Result<()> {
    let id_str        = encode_uuid(submission.id);
    let name          = submission.name.clone();
    let company       = submission.company.clone();
    let email         = submission.email.clone();
    let phone         = submission.phone.clone();
    let project_brief = submission.project_brief.clone();
    let at_str        = encode_dt(submission.timestamp);
    let status        = submission.status.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contact_submissions (
             id, name, company, email, phone, project_brief, timestamp, status
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            name,
            company,
            email,
            phone,
            project_brief,
            at_str,
            status,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_submission(&self, id: Uuid) -> Result<Option<Submission>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSubmission> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{SELECT_SUBMISSION} WHERE id = ?1"),
            rusqlite::params![id_str],
            raw_submission,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSubmission::into_submission).transpose()
  }
}
