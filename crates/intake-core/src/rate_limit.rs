//! Per-key sliding-window admission control.
//!
//! Each key owns a queue of admission instants. A check prunes instants that
//! have aged out of the window, then admits only if fewer than `limit`
//! remain. The prune-count-append sequence for one key runs under that key's
//! shard lock, so concurrent callers can never over-admit.
//!
//! Keys are never evicted; state is process-local and lost on restart.

use std::{
  collections::VecDeque,
  fmt::Debug,
  sync::Arc,
  time::{Duration, Instant},
};

use dashmap::DashMap;

/// Source of monotonic time for the limiter.
pub trait Clock: Send + Sync + Debug {
  fn now(&self) -> Instant;
}

/// [`Clock`] backed by `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> Instant { Instant::now() }
}

/// Limit and window applied to every key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
  pub limit:  u32,
  pub window: Duration,
}

impl Default for RateLimitPolicy {
  /// Three submissions per five minutes.
  fn default() -> Self {
    RateLimitPolicy {
      limit:  3,
      window: Duration::from_secs(300),
    }
  }
}

/// Sliding-window rate limiter keyed by an arbitrary string.
#[derive(Debug)]
pub struct RateLimiter {
  windows: DashMap<String, VecDeque<Instant>>,
  clock:   Arc<dyn Clock>,
}

impl Default for RateLimiter {
  fn default() -> Self { Self::new() }
}

impl RateLimiter {
  pub fn new() -> Self { Self::with_clock(Arc::new(SystemClock)) }

  pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
    RateLimiter {
      windows: DashMap::new(),
      clock,
    }
  }

  /// Decide whether one more event for `key` fits in the trailing `window`.
  ///
  /// On admission the current instant is recorded; a rejection records
  /// nothing, so rejected attempts do not extend the lockout.
  pub fn admit(&self, key: &str, limit: u32, window: Duration) -> bool {
    let now = self.clock.now();

    // The entry guard holds the shard write lock until it is dropped.
    let mut stamps = self.windows.entry(key.to_owned()).or_default();

    while let Some(&oldest) = stamps.front() {
      if now.saturating_duration_since(oldest) >= window {
        stamps.pop_front();
      } else {
        break;
      }
    }

    if stamps.len() >= limit as usize {
      return false;
    }

    stamps.push_back(now);
    true
  }

  /// [`admit`](Self::admit) with the limit and window taken from `policy`.
  pub fn admit_with(&self, key: &str, policy: RateLimitPolicy) -> bool {
    self.admit(key, policy.limit, policy.window)
  }

  /// Number of keys that have ever been checked.
  pub fn tracked_keys(&self) -> usize { self.windows.len() }
}

/// Manually advanced clock for deterministic tests.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct ManualClock {
  now: std::sync::Mutex<Instant>,
}

#[cfg(test)]
impl ManualClock {
  pub(crate) fn new() -> Arc<Self> {
    Arc::new(ManualClock {
      now: std::sync::Mutex::new(Instant::now()),
    })
  }

  pub(crate) fn advance(&self, by: Duration) {
    *self.now.lock().expect("clock mutex poisoned") += by;
  }
}

#[cfg(test)]
impl Clock for ManualClock {
  fn now(&self) -> Instant { *self.now.lock().expect("clock mutex poisoned") }
}
