// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task dispatch adapter
//!
//! The queue/worker system that executes tasks is an external
//! collaborator; the core only calls its submission interface. Queueing
//! and retry semantics of the dispatch system are its own responsibility.

mod noop;

pub use noop::NoOpDispatchClient;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeDispatchClient, SubmitCall};

use async_trait::async_trait;
use outbox_core::ScheduleEntry;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors from submitting a task to the dispatch system
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("dispatch queue unavailable: {0}")]
    QueueUnavailable(String),
    #[error("dispatch rejected: {0}")]
    Rejected(String),
}

/// One task submission: identifier plus arguments forwarded verbatim
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    pub task: String,
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
    pub options: Map<String, Value>,
}

impl DispatchRequest {
    pub fn from_entry(entry: &ScheduleEntry) -> Self {
        Self {
            task: entry.task.clone(),
            args: entry.args.clone(),
            kwargs: entry.kwargs.clone(),
            options: entry.options.clone(),
        }
    }
}

/// Acknowledgment returned by the dispatch system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    pub id: String,
}

/// Adapter for the external task dispatch system
#[async_trait]
pub trait DispatchClient: Send + Sync + 'static {
    /// Submit a task for execution; fire-and-forget from the
    /// scheduler's perspective
    async fn submit(&self, request: DispatchRequest) -> Result<DispatchReceipt, DispatchError>;
}
