// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake dispatch client for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{DispatchClient, DispatchError, DispatchReceipt, DispatchRequest};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Recorded submission
#[derive(Debug, Clone)]
pub struct SubmitCall {
    pub request: DispatchRequest,
    pub receipt: Option<DispatchReceipt>,
}

/// Fake dispatch client that records submissions and can be told to
/// fail specific tasks
#[derive(Clone, Default)]
pub struct FakeDispatchClient {
    calls: Arc<Mutex<Vec<SubmitCall>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl FakeDispatchClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make submissions for `task` fail with a queue-unavailable error
    pub fn fail_task(&self, task: &str) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(task.to_string());
    }

    /// Get all recorded submissions
    pub fn calls(&self) -> Vec<SubmitCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Task ids of successful submissions, in submission order
    pub fn submitted_tasks(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter(|c| c.receipt.is_some())
            .map(|c| c.request.task.clone())
            .collect()
    }
}

#[async_trait]
impl DispatchClient for FakeDispatchClient {
    async fn submit(&self, request: DispatchRequest) -> Result<DispatchReceipt, DispatchError> {
        let failing = self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&request.task);

        let receipt = if failing {
            None
        } else {
            Some(DispatchReceipt {
                id: Uuid::new_v4().to_string(),
            })
        };

        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SubmitCall {
                request: request.clone(),
                receipt: receipt.clone(),
            });

        receipt.ok_or_else(|| DispatchError::QueueUnavailable(request.task))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
