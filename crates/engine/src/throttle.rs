// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Throttle controller for rate-limited outbound dispatch
//!
//! Enforces a per-key attempt budget before callers reach an external
//! resource. The per-key window state machine lives in `outbox-core`;
//! this controller adds the shared state map and the sleep/raise
//! behavior on exhaustion. The lock covers only the bookkeeping
//! transition; callers sleep outside it, so one slow sender never
//! blocks another key's bookkeeping.

use outbox_core::clock::Clock;
use outbox_core::throttle::{Admission, ThrottleMode, ThrottlePolicy, ThrottleWindow};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// Backpressure signal distinct from transport/send errors
#[derive(Debug, Error)]
pub enum ThrottleError {
    #[error("throttled on '{key}': retry after {retry_after:?}")]
    Backpressure {
        key: String,
        /// Advisory wait before the caller should retry
        retry_after: Duration,
    },
}

/// Grants or delays dispatch attempts per counter scope
pub struct ThrottleController<C: Clock> {
    windows: Mutex<HashMap<String, ThrottleWindow>>,
    clock: C,
}

impl<C: Clock> ThrottleController<C> {
    pub fn new(clock: C) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Ask permission for one attempt against `key`.
    ///
    /// Granted attempts return immediately; this is the common fast
    /// path and never sleeps. On an exhausted window, `sleep` mode
    /// blocks for the computed backoff and retries (tolerating policies
    /// where the window outlives the wait, accumulating backoff until
    /// granted); `raise` mode returns a backpressure error carrying the
    /// advisory retry-after.
    pub async fn acquire(&self, key: &str, policy: &ThrottlePolicy) -> Result<(), ThrottleError> {
        loop {
            let admission = {
                let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
                let window = windows
                    .entry(key.to_string())
                    .or_insert_with(|| ThrottleWindow::new(self.clock.now()));
                window.admit(self.clock.now(), policy)
            };

            let wait = match admission {
                Admission::Granted => return Ok(()),
                Admission::Exhausted { wait } => wait,
            };

            match policy.mode {
                ThrottleMode::Raise => {
                    tracing::debug!(key, retry_after = ?wait, "throttle denied");
                    return Err(ThrottleError::Backpressure {
                        key: key.to_string(),
                        retry_after: wait,
                    });
                }
                ThrottleMode::Sleep => {
                    tracing::debug!(key, backoff = ?wait, "throttle window exhausted, sleeping");
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Snapshot of the current window state for `key`, if one exists
    pub fn window(&self, key: &str) -> Option<ThrottleWindow> {
        self.windows
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

#[cfg(test)]
#[path = "throttle_tests.rs"]
mod tests;
