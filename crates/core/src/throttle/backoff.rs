// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backoff computation
//!
//! Pure functions; callers decide whether to sleep for the returned wait
//! or surface it as a retry-after hint.

use super::{BackoffStrategy, ThrottlePolicy};
use rand::Rng;
use std::time::Duration;

/// Compute the wait for the given number of consecutive exhaustions.
///
/// `fixed` always yields the base; `exponential` yields
/// `base * 2^exhaustions` capped at `backoff-cap`. Jitter is applied
/// separately via [`jittered`].
pub fn next_wait(policy: &ThrottlePolicy, exhaustions: u32) -> Duration {
    match policy.backoff_strategy {
        BackoffStrategy::Fixed => policy.backoff_base,
        BackoffStrategy::Exponential => {
            let factor = 1u128 << exhaustions.min(63);
            let nanos = policy
                .backoff_base
                .as_nanos()
                .saturating_mul(factor)
                .min(policy.backoff_cap.as_nanos());
            Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
        }
    }
}

/// Replace `wait` with a uniformly random duration in `[0, wait]`
pub fn jittered(wait: Duration, rng: &mut impl Rng) -> Duration {
    if wait.is_zero() {
        return wait;
    }
    let max_nanos = u64::try_from(wait.as_nanos()).unwrap_or(u64::MAX);
    Duration::from_nanos(rng.gen_range(0..=max_nanos))
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
