//! Status-check heartbeats.
//!
//! A liveness record with no business logic attached: stored, echoed, and
//! listed back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on the number of heartbeats returned by a single listing.
pub const STATUS_CHECK_LIST_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheck {
  pub id:          Uuid,
  pub client_name: String,
  pub timestamp:   DateTime<Utc>,
}

impl StatusCheck {
  pub fn new(input: NewStatusCheck) -> Self {
    StatusCheck {
      id:          Uuid::new_v4(),
      client_name: input.client_name,
      timestamp:   Utc::now(),
    }
  }
}

/// Client-supplied heartbeat body.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStatusCheck {
  pub client_name: String,
}
