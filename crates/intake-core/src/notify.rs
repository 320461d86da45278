//! Best-effort email notification for new submissions.
//!
//! [`NotificationDispatcher::notify`] composes a plain-text message and hands
//! it to a [`MailTransport`]. Every failure is logged and swallowed; the
//! caller never learns whether delivery worked.
//!
//! Submissions reach the dispatcher through a bounded queue
//! ([`spawn_dispatcher`]) drained by a single worker task, so request latency
//! never depends on the mail relay.

use std::{fmt, future::Future, time::Duration};

use thiserror::Error;
use tokio::{
  sync::mpsc::{self, error::TrySendError},
  task::JoinHandle,
};

use crate::submission::Submission;

/// Placeholder substituted for absent optional fields.
pub const NOT_PROVIDED: &str = "Not provided";

/// Default bound on a single delivery attempt.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

// ─── Message ─────────────────────────────────────────────────────────────────

/// A composed notification, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
  pub subject: String,
  pub body:    String,
}

impl Notification {
  pub fn compose(submission: &Submission) -> Self {
    let company = submission.company.as_deref().unwrap_or(NOT_PROVIDED);
    let phone = submission.phone.as_deref().unwrap_or(NOT_PROVIDED);

    let body = format!(
      "New contact form submission received:\n\
       \n\
       Name: {name}\n\
       Company: {company}\n\
       Email: {email}\n\
       Phone: {phone}\n\
       \n\
       Project Brief:\n\
       {brief}\n\
       \n\
       Submitted at: {at}\n",
      name = submission.name,
      email = submission.email,
      brief = submission.project_brief,
      at = submission.timestamp.to_rfc3339(),
    );

    Notification {
      subject: format!("New Contact Form Submission from {}", submission.name),
      body,
    }
  }
}

// ─── Transport ───────────────────────────────────────────────────────────────

/// Something that can deliver a [`Notification`] to the configured recipient.
pub trait MailTransport: Send + Sync + 'static {
  type Error: std::error::Error + Send + Sync + 'static;

  fn deliver<'a>(
    &'a self,
    message: &'a Notification,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

#[derive(Debug, Error)]
pub enum NotifyError {
  #[error("delivery timed out after {0:?}")]
  Timeout(Duration),

  #[error("transport error: {0}")]
  Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

// ─── Dispatcher ──────────────────────────────────────────────────────────────

/// Composes and delivers notifications, absorbing every failure.
pub struct NotificationDispatcher<T> {
  transport: Option<T>,
  timeout:   Duration,
}

impl<T> fmt::Debug for NotificationDispatcher<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NotificationDispatcher")
      .field("configured", &self.transport.is_some())
      .field("timeout", &self.timeout)
      .finish()
  }
}

impl<T: MailTransport> NotificationDispatcher<T> {
  /// `None` disables delivery; notifications are then logged and skipped.
  pub fn new(transport: Option<T>) -> Self {
    NotificationDispatcher {
      transport,
      timeout: DEFAULT_DELIVERY_TIMEOUT,
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn is_configured(&self) -> bool { self.transport.is_some() }

  /// Try to deliver a notification for `submission`. Never fails.
  pub async fn notify(&self, submission: &Submission) {
    let Some(transport) = &self.transport else {
      tracing::info!(
        submission_id = %submission.id,
        "mail transport not configured, skipping notification"
      );
      return;
    };

    match self.deliver(transport, submission).await {
      Ok(()) => tracing::info!(
        submission_id = %submission.id,
        "notification sent"
      ),
      Err(error) => tracing::error!(
        submission_id = %submission.id,
        %error,
        "failed to send notification"
      ),
    }
  }

  async fn deliver(
    &self,
    transport: &T,
    submission: &Submission,
  ) -> Result<(), NotifyError> {
    let message = Notification::compose(submission);
    tokio::time::timeout(self.timeout, transport.deliver(&message))
      .await
      .map_err(|_| NotifyError::Timeout(self.timeout))?
      .map_err(|e| NotifyError::Transport(Box::new(e)))
  }
}

// ─── Queue ───────────────────────────────────────────────────────────────────

/// Producer side of the notification queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct NotificationSender {
  tx: mpsc::Sender<Submission>,
}

impl NotificationSender {
  /// Queue `submission` for notification without waiting.
  ///
  /// When the queue is full or the worker has stopped, the notification is
  /// dropped with a warning. There is no retry.
  pub fn enqueue(&self, submission: Submission) {
    match self.tx.try_send(submission) {
      Ok(()) => {}
      Err(TrySendError::Full(s)) => tracing::warn!(
        submission_id = %s.id,
        "notification queue full, dropping notification"
      ),
      Err(TrySendError::Closed(s)) => tracing::warn!(
        submission_id = %s.id,
        "notification worker stopped, dropping notification"
      ),
    }
  }
}

/// Start the worker that drains the queue into `dispatcher`.
///
/// Submissions are notified one at a time, in enqueue order. The worker
/// exits once every [`NotificationSender`] has been dropped and the queue is
/// empty; awaiting the returned handle waits for that.
pub fn spawn_dispatcher<T: MailTransport>(
  dispatcher: NotificationDispatcher<T>,
  capacity: usize,
) -> (NotificationSender, JoinHandle<()>) {
  let (tx, mut rx) = mpsc::channel::<Submission>(capacity.max(1));

  let handle = tokio::spawn(async move {
    tracing::debug!(?dispatcher, "notification worker started");
    while let Some(submission) = rx.recv().await {
      dispatcher.notify(&submission).await;
    }
    tracing::debug!("notification worker stopped");
  });

  (NotificationSender { tx }, handle)
}
