// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! outbox-engine: Runtime for the scheduling and throttle core
//!
//! This crate provides:
//! - **SchedulerTicker**: drift-corrected tick loop dispatching due entries
//! - **ThrottleController**: per-key attempt budgets with sleep/raise modes
//! - **DispatchClient**: adapter for the external task queue
//! - **Outbound / MailTransport**: throttled outbound mail glue

pub mod dispatch;
pub mod mail;
pub mod throttle;
pub mod ticker;

pub use dispatch::{
    DispatchClient, DispatchError, DispatchReceipt, DispatchRequest, NoOpDispatchClient,
};
pub use mail::{MailTransport, NoOpTransport, Outbound, OutboundMessage, SendError, TransportError};
pub use throttle::{ThrottleController, ThrottleError};
pub use ticker::{next_deadline, SchedulerTicker, TickReport};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use dispatch::{FakeDispatchClient, SubmitCall};
#[cfg(any(test, feature = "test-support"))]
pub use mail::{DeliverCall, FakeTransport};
