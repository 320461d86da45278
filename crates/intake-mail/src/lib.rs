//! SMTP delivery for intake notifications.
//!
//! [`SmtpMailer`] implements [`intake_core::notify::MailTransport`] over an
//! authenticated STARTTLS connection to a mail relay.

pub mod error;

use std::time::Duration;

use intake_core::notify::{MailTransport, Notification};
use lettre::{
  AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
  message::{Mailbox, header::ContentType},
  transport::smtp::authentication::Credentials,
};

pub use error::{Error, Result};

/// Recipient used when none is configured.
pub const DEFAULT_RECIPIENT: &str = "info@mg-experts.com";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Mail relay settings. Delivery is disabled unless both `host` and `user`
/// are set.
#[derive(Debug, Clone)]
pub struct MailConfig {
  pub host:      Option<String>,
  pub port:      u16,
  pub user:      Option<String>,
  pub password:  Option<String>,
  pub recipient: String,
  /// Per-command SMTP timeout.
  pub timeout:   Duration,
}

impl Default for MailConfig {
  fn default() -> Self {
    MailConfig {
      host:      None,
      port:      587,
      user:      None,
      password:  None,
      recipient: DEFAULT_RECIPIENT.to_owned(),
      timeout:   Duration::from_secs(10),
    }
  }
}

// ─── Mailer ───────────────────────────────────────────────────────────────────

/// Sends notifications from the relay user's address to one recipient.
pub struct SmtpMailer {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from:      String,
  to:        String,
}

impl SmtpMailer {
  /// Build a mailer from `config`, or `None` if the relay host or user is
  /// missing. No connection is made until the first delivery.
  pub fn from_config(config: &MailConfig) -> Result<Option<Self>> {
    let (Some(host), Some(user)) = (non_blank(&config.host), non_blank(&config.user))
    else {
      return Ok(None);
    };

    let credentials = Credentials::new(
      user.to_owned(),
      config.password.clone().unwrap_or_default(),
    );

    let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
      .port(config.port)
      .credentials(credentials)
      .timeout(Some(config.timeout))
      .build();

    Ok(Some(SmtpMailer {
      transport,
      from: user.to_owned(),
      to: config.recipient.clone(),
    }))
  }

  fn build_message(&self, notification: &Notification) -> Result<Message> {
    let from: Mailbox = self.from.parse()?;
    let to: Mailbox = self.to.parse()?;

    Ok(
      Message::builder()
        .from(from)
        .to(to)
        .subject(notification.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(notification.body.clone())?,
    )
  }
}

impl MailTransport for SmtpMailer {
  type Error = Error;

  async fn deliver(&self, notification: &Notification) -> Result<()> {
    let message = self.build_message(notification)?;
    self.transport.send(message).await?;
    Ok(())
  }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
  value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
