// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake mail transport for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{MailTransport, OutboundMessage, TransportError};
use async_trait::async_trait;
use outbox_core::config::MailServerConfig;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Recorded delivery attempt
#[derive(Debug, Clone)]
pub struct DeliverCall {
    pub alias: String,
    pub message: OutboundMessage,
    pub delivered: bool,
}

/// Fake transport that records deliveries and can be told to fail
/// specific server aliases
#[derive(Clone, Default)]
pub struct FakeTransport {
    calls: Arc<Mutex<Vec<DeliverCall>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make deliveries via `alias` fail with a connection error
    pub fn fail_server(&self, alias: &str) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(alias.to_string());
    }

    /// Get all recorded delivery attempts
    pub fn calls(&self) -> Vec<DeliverCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Recipients of successful deliveries, in delivery order
    pub fn delivered_to(&self) -> Vec<String> {
        self.calls()
            .iter()
            .filter(|c| c.delivered)
            .map(|c| c.message.to.clone())
            .collect()
    }
}

#[async_trait]
impl MailTransport for FakeTransport {
    async fn deliver(
        &self,
        server: &MailServerConfig,
        message: &OutboundMessage,
    ) -> Result<(), TransportError> {
        let failing = self
            .failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&server.alias);

        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(DeliverCall {
                alias: server.alias.clone(),
                message: message.clone(),
                delivered: !failing,
            });

        if failing {
            return Err(TransportError::Connection(format!(
                "relay '{}' unreachable",
                server.alias
            )));
        }
        Ok(())
    }
}
