//! Test doubles shared by the unit tests in this crate.

use std::{
  sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
  time::Duration,
};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::{
  notify::{MailTransport, Notification},
  status::StatusCheck,
  store::IntakeStore,
  submission::{NewSubmission, Submission},
};

pub fn new_submission(email: &str) -> NewSubmission {
  NewSubmission {
    name:          "Ada Lovelace".into(),
    company:       None,
    email:         email.into(),
    phone:         None,
    project_brief: "Analytical engine retrofit".into(),
  }
}

pub fn submission(email: &str) -> Submission {
  Submission::new(new_submission(email), Utc::now())
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("simulated store failure")]
pub struct StoreUnavailable;

/// In-memory [`IntakeStore`] whose writes can be switched to fail.
#[derive(Default)]
pub struct MemoryStore {
  status_checks: Mutex<Vec<StatusCheck>>,
  submissions:   Mutex<Vec<Submission>>,
  fail_writes:   AtomicBool,
}

impl MemoryStore {
  pub fn failing() -> Self {
    let store = Self::default();
    store.fail_writes.store(true, Ordering::SeqCst);
    store
  }

  pub fn submissions(&self) -> Vec<Submission> {
    self.submissions.lock().unwrap().clone()
  }

  fn check_writable(&self) -> Result<(), StoreUnavailable> {
    if self.fail_writes.load(Ordering::SeqCst) {
      Err(StoreUnavailable)
    } else {
      Ok(())
    }
  }
}

impl IntakeStore for MemoryStore {
  type Error = StoreUnavailable;

  async fn insert_status_check(&self, check: &StatusCheck) -> Result<(), StoreUnavailable> {
    self.check_writable()?;
    self.status_checks.lock().unwrap().push(check.clone());
    Ok(())
  }

  async fn list_status_checks(&self, limit: usize) -> Result<Vec<StatusCheck>, StoreUnavailable> {
    Ok(self.status_checks.lock().unwrap().iter().take(limit).cloned().collect())
  }

  async fn insert_submission(&self, submission: &Submission) -> Result<(), StoreUnavailable> {
    self.check_writable()?;
    self.submissions.lock().unwrap().push(submission.clone());
    Ok(())
  }

  async fn get_submission(&self, id: Uuid) -> Result<Option<Submission>, StoreUnavailable> {
    Ok(self.submissions.lock().unwrap().iter().find(|s| s.id == id).cloned())
  }
}

// ─── Transport ───────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("simulated relay failure")]
pub struct RelayDown;

/// [`MailTransport`] that records every message it is asked to deliver.
#[derive(Clone, Default)]
pub struct SpyTransport {
  attempts: Arc<AtomicUsize>,
  sent:     Arc<Mutex<Vec<Notification>>>,
  fail:     bool,
  delay:    Option<Duration>,
}

impl SpyTransport {
  pub fn failing() -> Self {
    SpyTransport {
      fail: true,
      ..Self::default()
    }
  }

  pub fn slow(delay: Duration) -> Self {
    SpyTransport {
      delay: Some(delay),
      ..Self::default()
    }
  }

  pub fn attempts(&self) -> usize { self.attempts.load(Ordering::SeqCst) }

  pub fn sent(&self) -> Vec<Notification> { self.sent.lock().unwrap().clone() }
}

impl MailTransport for SpyTransport {
  type Error = RelayDown;

  async fn deliver(&self, message: &Notification) -> Result<(), RelayDown> {
    self.attempts.fetch_add(1, Ordering::SeqCst);
    if let Some(delay) = self.delay {
      tokio::time::sleep(delay).await;
    }
    if self.fail {
      return Err(RelayDown);
    }
    self.sent.lock().unwrap().push(message.clone());
    Ok(())
  }
}
