//! Behavioral specifications for the outbox scheduling and throttle core.
//!
//! These tests are end-to-end at the library boundary: TOML configuration
//! in, dispatch submissions and throttle decisions out, with time driven
//! by the fake clock.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use outbox_core::clock::{Clock, FakeClock};
use outbox_core::config::Config;
use outbox_core::schedule::ScheduleRegistry;
use outbox_engine::mail::OutboundMessage;
use outbox_engine::{FakeDispatchClient, FakeTransport, Outbound, SchedulerTicker, SendError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const CONFIG: &str = r#"
[scheduler]
tick-interval = "1s"
max-schedule-lifetime = 0

[[schedule]]
key = "daily"
name = "Daily digest"
task = "mail.send_digest"
at = "00:00"

[[schedule]]
name = "Queue sweep"
task = "mail.sweep"

[[mail.server]]
alias = "primary"

[mail.server.throttle]
threshold = 2
period = "30s"
mode = "raise"

[[mail.server]]
alias = "fallback"

[mail.server.throttle]
threshold = 2
period = "30s"
mode = "raise"
key = "shared-relay"
"#;

fn load_registry(config: &Config, clock: &FakeClock) -> Arc<Mutex<ScheduleRegistry>> {
    let mut registry = ScheduleRegistry::new(config.scheduler.lifetime());
    for entry in config.schedule_entries().unwrap() {
        registry.upsert(entry, clock);
    }
    Arc::new(Mutex::new(registry))
}

#[tokio::test]
async fn daily_entry_dispatches_once_at_the_day_boundary() {
    let config = Config::from_toml_str(CONFIG).unwrap();
    let midnight = Utc.with_ymd_and_hms(2026, 6, 16, 0, 0, 0).unwrap();
    let clock = FakeClock::at(midnight - ChronoDuration::seconds(5));

    let client = FakeDispatchClient::new();
    let ticker = SchedulerTicker::new(
        &config.scheduler,
        load_registry(&config, &clock),
        Arc::new(client.clone()),
        clock.clone(),
    );

    // Ten one-second ticks spanning midnight
    for _ in 0..10 {
        let window_start = clock.now();
        clock.advance(ChronoDuration::seconds(1));
        ticker.run_tick(window_start, clock.now()).await;
    }

    let digests = client
        .submitted_tasks()
        .iter()
        .filter(|t| *t == "mail.send_digest")
        .count();
    assert_eq!(digests, 1, "daily entry must fire exactly once");

    // The every-tick sweep fired on all ten
    let sweeps = client
        .submitted_tasks()
        .iter()
        .filter(|t| *t == "mail.sweep")
        .count();
    assert_eq!(sweeps, 10);
}

#[tokio::test]
async fn config_reload_replaces_entries_without_duplicating() {
    let config = Config::from_toml_str(CONFIG).unwrap();
    let clock = FakeClock::new();
    let registry = load_registry(&config, &clock);

    // Reload: same keys, one changed task
    let reloaded = Config::from_toml_str(&CONFIG.replace("mail.send_digest", "mail.send_summary"))
        .unwrap();
    {
        let mut registry = registry.lock().unwrap();
        for entry in reloaded.schedule_entries().unwrap() {
            registry.upsert(entry, &clock);
        }
    }

    let registry = registry.lock().unwrap();
    let active = registry.list_active(clock.now());
    assert_eq!(active.len(), 2);
    let daily = active.iter().find(|e| e.key.to_string() == "daily").unwrap();
    assert_eq!(daily.task, "mail.send_summary");
}

#[tokio::test]
async fn throttled_send_burst_grants_threshold_then_backpressures() {
    let config = Config::from_toml_str(CONFIG).unwrap();
    let clock = FakeClock::new();
    let transport = FakeTransport::new();
    let outbound = Outbound::new(config.mail.clone(), transport.clone(), clock.clone());
    let message = OutboundMessage::new("user@example.com", "Digest", "hello");

    assert!(outbound.send("primary", &message).await.is_ok());
    assert!(outbound.send("primary", &message).await.is_ok());

    let err = outbound.send("primary", &message).await.unwrap_err();
    assert!(matches!(err, SendError::Throttled(_)));
    assert_eq!(transport.calls().len(), 2);

    // The window rolls over and capacity returns
    clock.advance(ChronoDuration::seconds(31));
    assert!(outbound.send("primary", &message).await.is_ok());
}

#[tokio::test]
async fn scheduler_loop_drives_dispatch_end_to_end() {
    let raw = r#"
        [scheduler]
        tick-interval = "20ms"

        [[schedule]]
        name = "Queue sweep"
        task = "mail.sweep"
    "#;
    let config = Config::from_toml_str(raw).unwrap();
    let clock = outbox_core::clock::SystemClock;

    let mut registry = ScheduleRegistry::new(config.scheduler.lifetime());
    for entry in config.schedule_entries().unwrap() {
        registry.upsert(entry, &clock);
    }
    let client = FakeDispatchClient::new();
    let ticker = SchedulerTicker::new(
        &config.scheduler,
        Arc::new(Mutex::new(registry)),
        Arc::new(client.clone()),
        clock,
    );

    ticker.start().await;
    tokio::time::sleep(Duration::from_millis(110)).await;
    ticker.stop().await;

    assert!(
        client.submitted_tasks().len() >= 2,
        "loop should have ticked repeatedly"
    );
}
