// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-key throttle window state machine
//!
//! Tracks attempts within the current period window and the run of
//! exhausted windows that drives exponential backoff. Pure: the clock
//! value is passed in, and the caller decides what to do with an
//! `Exhausted` admission (sleep or raise).

use super::{backoff, ThrottlePolicy};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Outcome of asking the window to admit one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The attempt may proceed
    Granted,
    /// The window is exhausted; wait this long before retrying
    Exhausted { wait: Duration },
}

/// Runtime throttle state for one counter scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleWindow {
    /// When the current window opened
    pub window_start: DateTime<Utc>,
    /// Attempts recorded in the current window
    pub count: u32,
    /// Windows in a row that hit the threshold; exponent for
    /// exponential backoff
    pub consecutive_exhaustions: u32,
}

impl ThrottleWindow {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            window_start: now,
            count: 0,
            consecutive_exhaustions: 0,
        }
    }

    /// Record one attempt against the policy.
    ///
    /// Rolls the window over when `period` has elapsed; a prior window
    /// that completed without hitting the threshold resets the
    /// exhaustion run. Denials increment the run first, so repeated
    /// attempts against a still-exhausted window escalate the wait.
    pub fn admit(&mut self, now: DateTime<Utc>, policy: &ThrottlePolicy) -> Admission {
        self.roll_over(now, policy);

        if self.count < policy.threshold {
            self.count += 1;
            return Admission::Granted;
        }

        self.consecutive_exhaustions = self.consecutive_exhaustions.saturating_add(1);
        let mut wait = backoff::next_wait(policy, self.consecutive_exhaustions - 1);
        if policy.jitter {
            wait = backoff::jittered(wait, &mut rand::thread_rng());
        }
        Admission::Exhausted { wait }
    }

    fn roll_over(&mut self, now: DateTime<Utc>, policy: &ThrottlePolicy) {
        let period = chrono::Duration::from_std(policy.period).unwrap_or(chrono::Duration::MAX);
        let window_end = self.window_start.checked_add_signed(period);
        if window_end.is_none_or(|end| now <= end) {
            return;
        }
        if self.count < policy.threshold {
            self.consecutive_exhaustions = 0;
        }
        self.window_start = now;
        self.count = 0;
    }
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
