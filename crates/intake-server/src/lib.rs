//! Process wiring for the intake API server.
//!
//! Turns a [`ServerConfig`] and an opened store into a ready-to-serve axum
//! [`Router`] with the notification worker running behind it.

pub mod config;

pub use config::{ServerConfig, StoreLocation};

use std::sync::Arc;

use axum::Router;
use intake_api::{AppState, api_router};
use intake_core::{
  notify::{MailTransport, NotificationDispatcher, spawn_dispatcher},
  rate_limit::RateLimiter,
  service::SubmissionService,
  store::IntakeStore,
};
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

/// Build the full application router, mounted under `/api`.
///
/// Also returns the notification worker. It finishes once the router (and
/// every clone of it) has been dropped and the queue is drained.
pub fn build_app<S, T>(
  config: &ServerConfig,
  store: Arc<S>,
  transport: Option<T>,
) -> (Router, JoinHandle<()>)
where
  S: IntakeStore + 'static,
  T: MailTransport,
{
  let dispatcher =
    NotificationDispatcher::new(transport).with_timeout(config.notify_timeout());
  if !dispatcher.is_configured() {
    tracing::info!("SMTP not configured, email notifications disabled");
  }
  let (notifications, worker) =
    spawn_dispatcher(dispatcher, config.notify_queue_capacity);

  let submissions = Arc::new(SubmissionService::new(
    Arc::clone(&store),
    Arc::new(RateLimiter::new()),
    config.rate_limit_policy(),
    notifications,
  ));
  let policy = submissions.policy();
  tracing::info!(
    limit = policy.limit,
    window_secs = policy.window.as_secs(),
    "submission rate limit configured"
  );

  let app = Router::new()
    .nest("/api", api_router(AppState { store, submissions }))
    .layer(TraceLayer::new_for_http())
    .layer(config.cors_layer());

  (app, worker)
}

#[cfg(test)]
mod tests;
