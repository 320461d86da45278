//! JSON REST API for the intake service.
//!
//! Exposes an axum [`Router`] backed by any [`IntakeStore`]. CORS, tracing
//! and the listening socket are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", intake_api::api_router(state))
//! ```

pub mod contact;
pub mod error;
pub mod status;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use intake_core::{service::SubmissionService, store::IntakeStore};
use serde_json::{Value, json};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store:       Arc<S>,
  pub submissions: Arc<SubmissionService<S>>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    AppState {
      store:       Arc::clone(&self.store),
      submissions: Arc::clone(&self.submissions),
    }
  }
}

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: IntakeStore + 'static,
{
  Router::new()
    .route("/", get(root))
    // Heartbeats
    .route("/status", get(status::list::<S>).post(status::create::<S>))
    // Contact form
    .route("/contact", post(contact::create::<S>))
    .with_state(state)
}

/// `GET /`
async fn root() -> Json<Value> { Json(json!({ "message": "Hello World" })) }
