//! The `IntakeStore` trait.
//!
//! Implemented by storage backends (e.g. `intake-store-sqlite`). The service
//! and API layers depend on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{status::StatusCheck, submission::Submission};

/// Abstraction over the document store holding heartbeats and submissions.
///
/// Records arrive fully built: ids and timestamps are assigned before the
/// store sees them, and any identifier the backend generates internally is
/// never exposed.
///
/// Futures are `Send`; handlers hold the store behind an `Arc` on a
/// multi-threaded runtime.
pub trait IntakeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Heartbeats ────────────────────────────────────────────────────────

  /// Persist a heartbeat record.
  fn insert_status_check<'a>(
    &'a self,
    check: &'a StatusCheck,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Return up to `limit` heartbeats in insertion order.
  fn list_status_checks(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<StatusCheck>, Self::Error>> + Send + '_;

  // ── Submissions ───────────────────────────────────────────────────────

  /// Persist a contact-form submission.
  fn insert_submission<'a>(
    &'a self,
    submission: &'a Submission,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Retrieve a submission by id. Returns `None` if not found.
  fn get_submission(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Submission>, Self::Error>> + Send + '_;
}
