// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::schedule::TriggerSpec;
use crate::throttle::{BackoffStrategy, ThrottleMode};
use serde_json::json;

const FULL_CONFIG: &str = r#"
[scheduler]
enabled = true
tick-interval = "30s"
max-schedule-lifetime = 30

[[schedule]]
key = "digest"
name = "Daily digest"
task = "mail.send_digest"
at = ["07:30"]
args = [1, "two"]
kwargs = { audience = "all" }
options = { queue = "mail" }
enabled = true

[[schedule]]
name = "Queue sweep"
task = "mail.sweep"

[[mail.server]]
alias = "primary"

[mail.server.throttle]
threshold = 5
period = "30s"
mode = "sleep"
backoff-strategy = "exponential"
backoff-base = "1s"
backoff-cap = "60s"
jitter = false

[[mail.server]]
alias = "fallback"

[mail.server.throttle]
mode = "raise"
key = "shared-relay"
"#;

#[test]
fn full_config_parses_and_validates() {
    let config = Config::from_toml_str(FULL_CONFIG).unwrap();

    assert!(config.scheduler.enabled);
    assert_eq!(
        config.scheduler.tick_interval,
        std::time::Duration::from_secs(30)
    );
    assert_eq!(config.scheduler.max_schedule_lifetime, 30);
    assert_eq!(config.schedule.len(), 2);
    assert_eq!(config.mail.server.len(), 2);
}

#[test]
fn empty_document_yields_defaults() {
    let config = Config::from_toml_str("").unwrap();

    assert!(config.scheduler.enabled);
    assert_eq!(
        config.scheduler.tick_interval,
        std::time::Duration::from_secs(30)
    );
    assert_eq!(config.scheduler.max_schedule_lifetime, 30);
    assert!(config.schedule.is_empty());
    assert!(config.mail.server.is_empty());
}

#[test]
fn schedule_entries_carry_arguments_verbatim() {
    let config = Config::from_toml_str(FULL_CONFIG).unwrap();
    let entries = config.schedule_entries().unwrap();

    let digest = &entries[0];
    assert_eq!(digest.key.to_string(), "digest");
    assert_eq!(digest.task, "mail.send_digest");
    assert_eq!(digest.args, vec![json!(1), json!("two")]);
    assert_eq!(digest.kwargs["audience"], json!("all"));
    assert_eq!(digest.options["queue"], json!("mail"));
}

#[test]
fn entry_without_key_derives_one_from_name() {
    let config = Config::from_toml_str(FULL_CONFIG).unwrap();
    let entries = config.schedule_entries().unwrap();

    assert_eq!(entries[1].key.to_string(), "queue-sweep");
}

#[test]
fn entry_without_fire_times_runs_every_tick() {
    let config = Config::from_toml_str(FULL_CONFIG).unwrap();
    let entries = config.schedule_entries().unwrap();

    assert_eq!(entries[1].trigger, TriggerSpec::EveryTick);
}

#[test]
fn bare_string_fire_time_is_accepted() {
    let config = Config::from_toml_str(
        r#"
        [[schedule]]
        name = "Nightly"
        task = "mail.nightly"
        at = "02:00"
        "#,
    )
    .unwrap();
    let entries = config.schedule_entries().unwrap();

    assert!(matches!(entries[0].trigger, TriggerSpec::At(ref ts) if ts.len() == 1));
}

#[test]
fn empty_fire_time_list_means_every_tick() {
    let config = Config::from_toml_str(
        r#"
        [[schedule]]
        name = "Sweep"
        task = "mail.sweep"
        at = []
        "#,
    )
    .unwrap();
    let entries = config.schedule_entries().unwrap();

    assert_eq!(entries[0].trigger, TriggerSpec::EveryTick);
}

#[test]
fn lifetime_of_zero_or_less_disables_expiration() {
    let config = Config::from_toml_str(
        r#"
        [scheduler]
        max-schedule-lifetime = 0
        "#,
    )
    .unwrap();
    assert!(config.scheduler.lifetime().is_none());

    let config = Config::from_toml_str(
        r#"
        [scheduler]
        max-schedule-lifetime = -1
        "#,
    )
    .unwrap();
    assert!(config.scheduler.lifetime().is_none());
}

#[test]
fn positive_lifetime_converts_to_days() {
    let config = Config::from_toml_str("").unwrap();
    assert_eq!(
        config.scheduler.lifetime(),
        Some(chrono::Duration::days(30))
    );
}

#[test]
fn zero_tick_interval_is_rejected() {
    let err = Config::from_toml_str(
        r#"
        [scheduler]
        tick-interval = "0s"
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::NonPositiveTickInterval));
}

#[test]
fn invalid_fire_time_is_rejected_at_load() {
    let err = Config::from_toml_str(
        r#"
        [[schedule]]
        name = "Bad"
        task = "mail.bad"
        at = "25:99"
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidTrigger { .. }));
}

#[test]
fn missing_task_is_a_parse_error() {
    let err = Config::from_toml_str(
        r#"
        [[schedule]]
        name = "No task"
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn empty_name_is_rejected() {
    let err = Config::from_toml_str(
        r#"
        [[schedule]]
        name = "  "
        task = "mail.sweep"
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::EmptyField { field: "name", .. }));
}

#[test]
fn duplicate_entry_keys_are_rejected() {
    let err = Config::from_toml_str(
        r#"
        [[schedule]]
        key = "k"
        name = "First"
        task = "mail.a"

        [[schedule]]
        key = "k"
        name = "Second"
        task = "mail.b"
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateEntryKey(k) if k == "k"));
}

#[test]
fn duplicate_server_aliases_are_rejected() {
    let err = Config::from_toml_str(
        r#"
        [[mail.server]]
        alias = "primary"

        [[mail.server]]
        alias = "primary"
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateServerAlias(a) if a == "primary"));
}

#[test]
fn invalid_throttle_policy_is_rejected_at_load() {
    let err = Config::from_toml_str(
        r#"
        [[mail.server]]
        alias = "primary"

        [mail.server.throttle]
        backoff-base = "10s"
        backoff-cap = "5s"
        "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidThrottle { alias, .. } if alias == "primary"));
}

#[test]
fn throttle_key_defaults_to_alias() {
    let config = Config::from_toml_str(FULL_CONFIG).unwrap();

    let primary = config.mail_server("primary").unwrap();
    assert_eq!(primary.throttle_key(), "primary");

    let fallback = config.mail_server("fallback").unwrap();
    assert_eq!(fallback.throttle_key(), "shared-relay");
    assert_eq!(fallback.throttle.mode, ThrottleMode::Raise);
}

#[test]
fn unknown_server_lookup_returns_none() {
    let config = Config::from_toml_str(FULL_CONFIG).unwrap();
    assert!(config.mail_server("nope").is_none());
}

#[test]
fn throttle_defaults_apply_per_server() {
    let config = Config::from_toml_str(
        r#"
        [[mail.server]]
        alias = "plain"
        "#,
    )
    .unwrap();

    let server = config.mail_server("plain").unwrap();
    assert_eq!(server.throttle.threshold, 5);
    assert_eq!(server.throttle.backoff_strategy, BackoffStrategy::Fixed);
}
