//! Error types for `intake-core`.

use thiserror::Error;

/// Failures that stop the intake pipeline.
///
/// Notification failures are not represented here; they never reach the
/// caller (see [`crate::notify::NotifyError`]).
#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("too many submissions from this email address, try again later")]
  RateLimited,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
