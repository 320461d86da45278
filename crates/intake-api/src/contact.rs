//! Handler for `POST /contact`.
//!
//! Body: `{"name", "company"?, "email", "phone"?, "projectBrief"}`.
//! Returns 201 + the stored submission, 422 when a required field is missing
//! or blank, 429 when the sender is over their rate limit.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use intake_core::{store::IntakeStore, submission::NewSubmission};

use crate::{AppState, error::ApiError};

pub async fn create<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<NewSubmission>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: IntakeStore + 'static,
{
  let Json(body) = body?;
  let submission = state.submissions.create_submission(body).await?;
  Ok((StatusCode::CREATED, Json(submission)))
}
