// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tick-driven scheduler loop
//!
//! The ticker fires at absolute deadlines `started_at + n * tick_interval`
//! so evaluation latency does not accumulate as drift. Each tick expires
//! stale entries first, then evaluates dueness over the wall-clock window
//! `(previous tick, now]` and dispatches due entries in key order. A tick
//! that overruns its interval fires the next tick immediately; missed
//! deadlines inside the overrun are skipped, never replayed, so an entry
//! dispatches at most once per tick.

use crate::dispatch::{DispatchClient, DispatchRequest};
use chrono::{DateTime, Utc};
use outbox_core::clock::Clock;
use outbox_core::config::SchedulerConfig;
use outbox_core::schedule::{EntryKey, ScheduleRegistry};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// What one tick did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Entries removed because their lifetime elapsed
    pub expired: Vec<EntryKey>,
    /// Entries dispatched this tick, in dispatch order
    pub dispatched: Vec<EntryKey>,
    /// Entries whose dispatch failed; they stay registered and are
    /// retried on their next due occurrence
    pub failed: Vec<EntryKey>,
}

/// First deadline on the `started_at + n * interval` grid strictly after
/// `now`
pub fn next_deadline(
    started_at: DateTime<Utc>,
    interval: Duration,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    if now < started_at {
        return started_at;
    }
    let step_ns = i64::try_from(interval.as_nanos()).unwrap_or(i64::MAX).max(1);
    let elapsed_ns = (now - started_at).num_nanoseconds().unwrap_or(i64::MAX);
    let next_ns = (elapsed_ns / step_ns)
        .saturating_add(1)
        .saturating_mul(step_ns);
    started_at + chrono::Duration::nanoseconds(next_ns)
}

/// Evaluate one tick covering `(window_start, now]` against the registry.
///
/// Expiration runs before trigger evaluation, so an entry never fires in
/// the tick it expires. The registry lock is released before any dispatch
/// call; removals made during an in-flight tick take effect on the next
/// one. A dispatch failure is reported and does not stop evaluation of
/// the remaining entries.
async fn evaluate_tick<D: DispatchClient>(
    registry: &Mutex<ScheduleRegistry>,
    client: &D,
    window_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> TickReport {
    let mut report = TickReport::default();

    let due: Vec<(EntryKey, DispatchRequest)> = {
        let mut registry = registry.lock().unwrap_or_else(|e| e.into_inner());
        for registered in registry.expire(now) {
            report.expired.push(registered.entry.key.clone());
        }
        registry
            .list_active(now)
            .into_iter()
            .filter(|e| e.trigger.is_due(window_start, now))
            .map(|e| (e.key.clone(), DispatchRequest::from_entry(e)))
            .collect()
    };

    for key in &report.expired {
        tracing::info!(key = %key, "schedule entry expired");
    }

    for (key, request) in due {
        match client.submit(request).await {
            Ok(receipt) => {
                tracing::debug!(key = %key, receipt = %receipt.id, "dispatched");
                report.dispatched.push(key);
            }
            Err(error) => {
                tracing::warn!(key = %key, %error, "dispatch failed");
                report.failed.push(key);
            }
        }
    }

    report
}

/// Drives periodic evaluation of the schedule registry
pub struct SchedulerTicker<D, C: Clock> {
    registry: Arc<Mutex<ScheduleRegistry>>,
    client: Arc<D>,
    clock: C,
    enabled: bool,
    tick_interval: Duration,
    running: Arc<AtomicBool>,
    notify: Arc<Notify>,
    handle: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl<D: DispatchClient, C: Clock + 'static> SchedulerTicker<D, C> {
    pub fn new(
        config: &SchedulerConfig,
        registry: Arc<Mutex<ScheduleRegistry>>,
        client: Arc<D>,
        clock: C,
    ) -> Self {
        Self {
            registry,
            client,
            clock,
            enabled: config.enabled,
            tick_interval: config.tick_interval,
            running: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
            handle: tokio::sync::Mutex::new(None),
        }
    }

    pub fn registry(&self) -> Arc<Mutex<ScheduleRegistry>> {
        self.registry.clone()
    }

    /// Evaluate one tick covering `(window_start, now]`
    pub async fn run_tick(&self, window_start: DateTime<Utc>, now: DateTime<Utc>) -> TickReport {
        evaluate_tick(&self.registry, self.client.as_ref(), window_start, now).await
    }

    /// Start the tick loop. The first tick fires immediately.
    ///
    /// A no-op when the scheduler section is disabled.
    pub async fn start(&self) {
        if !self.enabled {
            tracing::info!("scheduler disabled, not starting");
            return;
        }
        // Prevent double start
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        let registry = self.registry.clone();
        let client = self.client.clone();
        let clock = self.clock.clone();
        let tick_interval = self.tick_interval;
        let running = self.running.clone();
        let notify = self.notify.clone();

        let handle = tokio::spawn(async move {
            let started_at = clock.now();
            let mut deadline = started_at;
            let mut last_tick = started_at
                - chrono::Duration::from_std(tick_interval).unwrap_or_else(|_| chrono::Duration::zero());

            while running.load(Ordering::Relaxed) {
                let now = clock.now();
                if now < deadline {
                    let wait = (deadline - now).to_std().unwrap_or(Duration::from_secs(1));
                    tokio::select! {
                        _ = tokio::time::sleep(wait) => {},
                        _ = notify.notified() => {},
                    }
                    continue;
                }

                let report = evaluate_tick(&registry, client.as_ref(), last_tick, now).await;
                tracing::debug!(
                    dispatched = report.dispatched.len(),
                    failed = report.failed.len(),
                    expired = report.expired.len(),
                    "tick complete"
                );
                last_tick = now;
                deadline = next_deadline(started_at, tick_interval, clock.now());
            }
        });

        let mut guard = self.handle.lock().await;
        *guard = Some(handle);
    }

    /// Stop the loop and wait for any in-flight tick to complete
    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.notify.notify_one();

        let handle = {
            let mut guard = self.handle.lock().await;
            guard.take()
        };
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
#[path = "ticker_tests.rs"]
mod tests;
