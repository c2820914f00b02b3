// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op dispatch client

use super::{DispatchClient, DispatchError, DispatchReceipt, DispatchRequest};
use async_trait::async_trait;
use uuid::Uuid;

/// Dispatch client that acknowledges every submission without doing
/// anything
#[derive(Clone, Default)]
pub struct NoOpDispatchClient;

impl NoOpDispatchClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DispatchClient for NoOpDispatchClient {
    async fn submit(&self, request: DispatchRequest) -> Result<DispatchReceipt, DispatchError> {
        tracing::debug!(task = %request.task, "noop dispatch");
        Ok(DispatchReceipt {
            id: Uuid::new_v4().to_string(),
        })
    }
}
