// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger specifications for schedule entries
//!
//! A trigger is either "fire on every tick" or a set of wall-clock fire
//! times (`HH:MM` or `HH:MM:SS`, 24-hour, UTC). Dueness is evaluated
//! against the half-open window `(window_start, window_end]` covered by
//! the current tick, so an occurrence fires on exactly one tick even when
//! ticks overrun and the window spans more than one interval.

use chrono::{DateTime, NaiveTime, Utc};
use thiserror::Error;

/// Errors from parsing a fire-time expression
#[derive(Debug, Error)]
pub enum TriggerParseError {
    #[error("invalid fire time '{0}': expected HH:MM or HH:MM:SS")]
    InvalidFireTime(String),
}

/// When a schedule entry should fire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerSpec {
    /// Fire on every scheduler tick
    EveryTick,
    /// Fire when a tick window contains one of these times of day
    At(Vec<NaiveTime>),
}

impl TriggerSpec {
    /// Parse a single fire-time expression
    pub fn parse_fire_time(expr: &str) -> Result<NaiveTime, TriggerParseError> {
        NaiveTime::parse_from_str(expr, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(expr, "%H:%M"))
            .map_err(|_| TriggerParseError::InvalidFireTime(expr.to_string()))
    }

    /// Build a trigger from configured fire times.
    ///
    /// An empty list is equivalent to an absent trigger: fire every tick.
    /// A non-empty list is exhaustive, not additive to the default.
    pub fn from_fire_times(times: &[String]) -> Result<Self, TriggerParseError> {
        if times.is_empty() {
            return Ok(TriggerSpec::EveryTick);
        }
        let parsed = times
            .iter()
            .map(|t| Self::parse_fire_time(t))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TriggerSpec::At(parsed))
    }

    /// Whether the entry is due for the tick covering `(window_start, window_end]`
    pub fn is_due(&self, window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> bool {
        match self {
            TriggerSpec::EveryTick => true,
            TriggerSpec::At(times) => times
                .iter()
                .any(|t| occurrence_in_window(*t, window_start, window_end)),
        }
    }
}

/// Check whether any occurrence of `time` falls within `(start, end]`.
///
/// Walks each calendar date the window touches; windows are at most a few
/// tick intervals wide, so the walk is short.
fn occurrence_in_window(time: NaiveTime, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    if end <= start {
        return false;
    }
    let mut date = start.date_naive();
    let last = end.date_naive();
    loop {
        let candidate = date.and_time(time).and_utc();
        if candidate > start && candidate <= end {
            return true;
        }
        if date >= last {
            return false;
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => return false,
        };
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
