// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound send path: resolve server, acquire throttle, deliver

use super::{MailTransport, OutboundMessage, TransportError};
use crate::throttle::{ThrottleController, ThrottleError};
use outbox_core::clock::Clock;
use outbox_core::config::MailConfig;
use thiserror::Error;

/// Errors from one outbound send
#[derive(Debug, Error)]
pub enum SendError {
    #[error("unknown mail server '{0}'")]
    UnknownServer(String),

    /// Backpressure from the throttle; carries the advisory retry-after
    #[error(transparent)]
    Throttled(#[from] ThrottleError),

    /// Transport failure; the throttle attempt already counted and is
    /// not refunded
    #[error("transport failure via '{alias}': {source}")]
    Transport {
        alias: String,
        #[source]
        source: TransportError,
    },
}

/// Sends messages through configured servers under throttle control
pub struct Outbound<T, C: Clock> {
    mail: MailConfig,
    transport: T,
    throttle: ThrottleController<C>,
}

impl<T: MailTransport, C: Clock> Outbound<T, C> {
    pub fn new(mail: MailConfig, transport: T, clock: C) -> Self {
        Self {
            mail,
            transport,
            throttle: ThrottleController::new(clock),
        }
    }

    /// Send one message via the server registered under `alias`.
    ///
    /// The throttle is consulted on the server's counter scope before
    /// the transport is touched; in `sleep` mode this call blocks until
    /// capacity is available.
    pub async fn send(&self, alias: &str, message: &OutboundMessage) -> Result<(), SendError> {
        let server = self
            .mail
            .server
            .iter()
            .find(|s| s.alias == alias)
            .ok_or_else(|| SendError::UnknownServer(alias.to_string()))?;

        self.throttle
            .acquire(server.throttle_key(), &server.throttle)
            .await?;

        self.transport
            .deliver(server, message)
            .await
            .map_err(|source| {
                tracing::warn!(alias = %server.alias, %source, "delivery failed");
                SendError::Transport {
                    alias: server.alias.clone(),
                    source,
                }
            })
    }

    /// The throttle controller, for callers that gate other work on the
    /// same counters
    pub fn throttle(&self) -> &ThrottleController<C> {
        &self.throttle
    }
}

#[cfg(test)]
#[path = "outbound_tests.rs"]
mod tests;
