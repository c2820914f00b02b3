// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Throttle policy for rate-limited outbound resources
//!
//! A policy caps attempts per time window for one counter scope (a mail
//! server alias, or a shared key covering several servers) and describes
//! the backoff applied once a window is exhausted.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// What happens to a caller once the window is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThrottleMode {
    /// Block the caller until the window allows the attempt
    Sleep,
    /// Fail fast with a backpressure error carrying a retry-after hint
    Raise,
}

/// How the post-exhaustion wait grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackoffStrategy {
    /// Always wait `backoff-base`
    Fixed,
    /// Wait `backoff-base * 2^n`, capped at `backoff-cap`
    Exponential,
}

/// Errors from validating a throttle policy
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("threshold must be positive")]
    NonPositiveThreshold,
    #[error("period must be positive")]
    NonPositivePeriod,
    #[error(
        "backoff-cap {} is below backoff-base {}",
        humantime::format_duration(*.cap),
        humantime::format_duration(*.base)
    )]
    CapBelowBase { base: Duration, cap: Duration },
}

/// Per-resource throttle configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ThrottlePolicy {
    /// Max attempts allowed per `period`
    pub threshold: u32,
    /// Window length
    #[serde(with = "humantime_serde")]
    pub period: Duration,
    pub mode: ThrottleMode,
    /// Counter-scope override; resources without one count under their
    /// own alias
    pub key: Option<String>,
    pub backoff_strategy: BackoffStrategy,
    #[serde(with = "humantime_serde")]
    pub backoff_base: Duration,
    /// Upper bound on the computed wait
    #[serde(with = "humantime_serde")]
    pub backoff_cap: Duration,
    /// Randomize the wait within `[0, wait]` to avoid synchronized
    /// retries across callers
    pub jitter: bool,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            threshold: 5,
            period: Duration::from_secs(30),
            mode: ThrottleMode::Sleep,
            key: None,
            backoff_strategy: BackoffStrategy::Fixed,
            backoff_base: Duration::from_secs(1),
            backoff_cap: Duration::from_secs(60),
            jitter: false,
        }
    }
}

impl ThrottlePolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.threshold == 0 {
            return Err(PolicyError::NonPositiveThreshold);
        }
        if self.period.is_zero() {
            return Err(PolicyError::NonPositivePeriod);
        }
        if self.backoff_cap < self.backoff_base {
            return Err(PolicyError::CapBelowBase {
                base: self.backoff_base,
                cap: self.backoff_cap,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
