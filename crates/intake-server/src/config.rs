//! Server configuration.
//!
//! Read once at startup from built-in defaults, an optional TOML file, and
//! unprefixed environment variables (`SMTP_HOST`, `CORS_ORIGINS`, …), in
//! increasing order of precedence. Missing mail settings disable
//! notifications rather than failing startup.

use std::{
  collections::HashMap,
  path::{Path, PathBuf},
  time::Duration,
};

use axum::http::HeaderValue;
use intake_core::rate_limit::RateLimitPolicy;
use intake_mail::{DEFAULT_RECIPIENT, MailConfig};
use serde::Deserialize;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

/// Value of `database_url` that selects a throwaway in-memory database.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                  String,
  #[serde(default = "default_port")]
  pub port:                  u16,
  /// Directory holding the database file, or `:memory:`.
  #[serde(default = "default_database_url")]
  pub database_url:          String,
  #[serde(default = "default_db_name")]
  pub db_name:               String,
  /// Comma-separated allowed origins; `*` allows any.
  #[serde(default = "default_cors_origins")]
  pub cors_origins:          String,
  pub smtp_host:             Option<String>,
  #[serde(default = "default_smtp_port")]
  pub smtp_port:             u16,
  pub smtp_user:             Option<String>,
  pub smtp_pass:             Option<String>,
  #[serde(default = "default_contact_email")]
  pub contact_email:         String,
  #[serde(default = "default_smtp_timeout_secs")]
  pub smtp_timeout_secs:     u64,
  #[serde(default = "default_notify_timeout_secs")]
  pub notify_timeout_secs:   u64,
  #[serde(default = "default_notify_queue_capacity")]
  pub notify_queue_capacity: usize,
  #[serde(default = "default_rate_limit")]
  pub rate_limit:            u32,
  #[serde(default = "default_rate_window_secs")]
  pub rate_window_secs:      u64,
}

fn default_host() -> String { "0.0.0.0".to_owned() }
fn default_port() -> u16 { 8001 }
fn default_database_url() -> String { ".".to_owned() }
fn default_db_name() -> String { "intake".to_owned() }
fn default_cors_origins() -> String { "*".to_owned() }
fn default_smtp_port() -> u16 { 587 }
fn default_contact_email() -> String { DEFAULT_RECIPIENT.to_owned() }
fn default_smtp_timeout_secs() -> u64 { 10 }
fn default_notify_timeout_secs() -> u64 { 30 }
fn default_notify_queue_capacity() -> usize { 64 }
fn default_rate_limit() -> u32 { 3 }
fn default_rate_window_secs() -> u64 { 300 }

/// Where the SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
  Memory,
  File(PathBuf),
}

impl ServerConfig {
  /// Load from `path` (if it exists) and the process environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    Self::from_sources(path, None)
  }

  /// Like [`load`](Self::load), but with `env` standing in for the process
  /// environment when given.
  pub fn from_sources(
    path: &Path,
    env: Option<HashMap<String, String>>,
  ) -> Result<Self, config::ConfigError> {
    // Values stay strings until deserialised, so secrets like `0123` keep
    // their leading zeros while numeric fields still parse.
    let config: Self = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::default().source(env))
      .build()?
      .try_deserialize()?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> Result<(), config::ConfigError> {
    if self.rate_limit == 0 {
      return Err(config::ConfigError::Message(
        "rate_limit must be at least 1".to_owned(),
      ));
    }
    if self.rate_window_secs == 0 {
      return Err(config::ConfigError::Message(
        "rate_window_secs must be at least 1".to_owned(),
      ));
    }
    Ok(())
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn store_location(&self) -> StoreLocation {
    if self.database_url.trim() == IN_MEMORY {
      return StoreLocation::Memory;
    }
    let dir = expand_tilde(Path::new(self.database_url.trim()));
    StoreLocation::File(dir.join(format!("{}.sqlite3", self.db_name)))
  }

  pub fn mail(&self) -> MailConfig {
    MailConfig {
      host:      self.smtp_host.clone(),
      port:      self.smtp_port,
      user:      self.smtp_user.clone(),
      password:  self.smtp_pass.clone(),
      recipient: self.contact_email.clone(),
      timeout:   Duration::from_secs(self.smtp_timeout_secs),
    }
  }

  pub fn notify_timeout(&self) -> Duration { Duration::from_secs(self.notify_timeout_secs) }

  pub fn rate_limit_policy(&self) -> RateLimitPolicy {
    RateLimitPolicy {
      limit:  self.rate_limit,
      window: Duration::from_secs(self.rate_window_secs),
    }
  }

  /// Origins from `cors_origins`, or `None` when any origin is allowed.
  pub fn allowed_origins(&self) -> Option<Vec<HeaderValue>> {
    let entries: Vec<&str> = self
      .cors_origins
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .collect();

    if entries.is_empty() || entries.contains(&"*") {
      return None;
    }

    let origins = entries
      .into_iter()
      .filter_map(|origin| match HeaderValue::from_str(origin) {
        Ok(v) => Some(v),
        Err(_) => {
          tracing::warn!(origin, "ignoring unparseable CORS origin");
          None
        }
      })
      .collect();
    Some(origins)
  }

  /// CORS policy: wildcard without credentials, or an explicit origin list
  /// with credentials and any method or header.
  pub fn cors_layer(&self) -> CorsLayer {
    match self.allowed_origins() {
      None => CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any),
      Some(origins) => CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
