//! Handlers for `/status` heartbeat endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/status` | Body: `{"client_name":"..."}`; returns 200 + stored record |
//! | `GET`  | `/status` | At most [`STATUS_CHECK_LIST_LIMIT`] records, oldest first |

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use intake_core::{
  status::{NewStatusCheck, STATUS_CHECK_LIST_LIMIT, StatusCheck},
  store::IntakeStore,
};

use crate::{AppState, error::ApiError};

/// `POST /status`: store, then echo the record.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  body: Result<Json<NewStatusCheck>, JsonRejection>,
) -> Result<Json<StatusCheck>, ApiError>
where
  S: IntakeStore + 'static,
{
  let Json(body) = body?;
  let check = StatusCheck::new(body);
  state
    .store
    .insert_status_check(&check)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(check))
}

/// `GET /status`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<StatusCheck>>, ApiError>
where
  S: IntakeStore + 'static,
{
  let checks = state
    .store
    .list_status_checks(STATUS_CHECK_LIST_LIMIT)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(checks))
}
