//! [`SubmissionService`]: the contact-form intake pipeline.
//!
//! validate → rate-limit → persist → enqueue notification.
//!
//! The first three steps can fail and stop the pipeline. Notification
//! happens strictly after a successful write and its outcome is invisible to
//! the caller.

use std::sync::Arc;

use chrono::Utc;

use crate::{
  Error, Result,
  notify::NotificationSender,
  rate_limit::{RateLimitPolicy, RateLimiter},
  store::IntakeStore,
  submission::{NewSubmission, Submission},
};

pub struct SubmissionService<S> {
  store:         Arc<S>,
  limiter:       Arc<RateLimiter>,
  policy:        RateLimitPolicy,
  notifications: NotificationSender,
}

impl<S: IntakeStore> SubmissionService<S> {
  pub fn new(
    store: Arc<S>,
    limiter: Arc<RateLimiter>,
    policy: RateLimitPolicy,
    notifications: NotificationSender,
  ) -> Self {
    SubmissionService {
      store,
      limiter,
      policy,
      notifications,
    }
  }

  pub fn policy(&self) -> RateLimitPolicy { self.policy }

  /// Accept a contact-form submission.
  ///
  /// Fails with [`Error::MissingField`] before touching the rate limiter, so
  /// malformed requests do not use up a sender's quota.
  pub async fn create_submission(&self, input: NewSubmission) -> Result<Submission> {
    let input = input.validate()?;

    if !self.limiter.admit_with(&input.rate_limit_key(), self.policy) {
      tracing::warn!(
        limit = self.policy.limit,
        window_secs = self.policy.window.as_secs(),
        "submission rejected by rate limiter"
      );
      tracing::debug!(
        tracked_keys = self.limiter.tracked_keys(),
        "rate limiter state"
      );
      return Err(Error::RateLimited);
    }

    let submission = Submission::new(input, Utc::now());

    self
      .store
      .insert_submission(&submission)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    tracing::info!(submission_id = %submission.id, "submission stored");

    self.notifications.enqueue(submission.clone());
    Ok(submission)
  }
}
