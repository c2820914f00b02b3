// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! outbox-core: Scheduling and throttle primitives for outbound dispatch
//!
//! This crate provides:
//! - Clock abstraction for testable wall-clock time
//! - Configuration schema with fail-fast validation
//! - Schedule entries, fire-time triggers, and the registry
//! - Throttle policy, window state machine, and backoff computation
//!
//! Everything here is pure and deterministic under an injected [`Clock`];
//! the tokio-driven ticker and the sleeping throttle controller live in
//! `outbox-engine`.

pub mod clock;
pub mod config;
pub mod schedule;
pub mod throttle;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    Config, ConfigError, FireTimes, MailConfig, MailServerConfig, ScheduleEntryConfig,
    SchedulerConfig,
};
pub use schedule::{EntryKey, Registered, ScheduleEntry, ScheduleRegistry, TriggerSpec};
pub use throttle::{
    Admission, BackoffStrategy, PolicyError, ThrottleMode, ThrottlePolicy, ThrottleWindow,
};
