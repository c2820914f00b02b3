// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound mail glue
//!
//! Server selection policy lives with the caller; this module covers the
//! path from "send via this alias" to the transport call, consulting the
//! throttle controller per server on the way. Throttling governs attempt
//! rate, not success: a transport failure is reported to the caller and
//! never touches throttle counters.

mod noop;
mod outbound;

pub use noop::NoOpTransport;
pub use outbound::{Outbound, SendError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DeliverCall, FakeTransport};

use async_trait::async_trait;
use outbox_core::config::MailServerConfig;
use thiserror::Error;

/// Errors from the mail transport itself (connection/protocol)
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// One outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutboundMessage {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Adapter for the external mail transport
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Hand one message to the relay behind `server`
    async fn deliver(
        &self,
        server: &MailServerConfig,
        message: &OutboundMessage,
    ) -> Result<(), TransportError>;
}
