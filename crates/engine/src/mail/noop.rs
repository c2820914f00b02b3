// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op mail transport

use super::{MailTransport, OutboundMessage, TransportError};
use async_trait::async_trait;
use outbox_core::config::MailServerConfig;

/// Transport that accepts every message without delivering anything
#[derive(Clone, Default)]
pub struct NoOpTransport;

impl NoOpTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MailTransport for NoOpTransport {
    async fn deliver(
        &self,
        server: &MailServerConfig,
        message: &OutboundMessage,
    ) -> Result<(), TransportError> {
        tracing::debug!(alias = %server.alias, to = %message.to, "noop delivery");
        Ok(())
    }
}
