// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Consumed configuration schema
//!
//! The application hands the core one `Config` value, constructed once at
//! startup and passed by reference into the registry, ticker, and
//! throttle controller. Validation is fail-fast: the scheduler must not
//! start with an invalid schedule or throttle policy.

use crate::schedule::{EntryKey, ScheduleEntry, TriggerParseError, TriggerSpec};
use crate::throttle::{PolicyError, ThrottlePolicy};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::time::Duration;
use thiserror::Error;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("scheduler tick-interval must be positive")]
    NonPositiveTickInterval,

    #[error("schedule entry '{entry}' has an empty {field}")]
    EmptyField { entry: String, field: &'static str },

    #[error("schedule entry '{entry}': {source}")]
    InvalidTrigger {
        entry: String,
        #[source]
        source: TriggerParseError,
    },

    #[error("duplicate schedule entry key '{0}'")]
    DuplicateEntryKey(String),

    #[error("mail server with an empty alias")]
    EmptyServerAlias,

    #[error("duplicate mail server alias '{0}'")]
    DuplicateServerAlias(String),

    #[error("mail server '{alias}': {source}")]
    InvalidThrottle {
        alias: String,
        #[source]
        source: PolicyError,
    },
}

/// Scheduler section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SchedulerConfig {
    pub enabled: bool,
    /// Seconds between ticks
    #[serde(with = "humantime_serde")]
    pub tick_interval: Duration,
    /// Days after which an unrefreshed entry expires; `<= 0` disables
    /// expiration
    pub max_schedule_lifetime: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval: Duration::from_secs(30),
            max_schedule_lifetime: 30,
        }
    }
}

impl SchedulerConfig {
    /// Entry lifetime as a duration; `None` when expiration is disabled
    pub fn lifetime(&self) -> Option<chrono::Duration> {
        (self.max_schedule_lifetime > 0).then(|| chrono::Duration::days(self.max_schedule_lifetime))
    }
}

/// A fire-time field that accepts a bare string or a list of strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FireTimes {
    One(String),
    Many(Vec<String>),
}

impl FireTimes {
    fn to_vec(&self) -> Vec<String> {
        match self {
            FireTimes::One(t) => vec![t.clone()],
            FireTimes::Many(ts) => ts.clone(),
        }
    }
}

/// One `[[schedule]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScheduleEntryConfig {
    #[serde(default)]
    pub key: Option<String>,
    pub name: String,
    pub task: String,
    /// Fire times; absent (or an empty list) means every tick
    #[serde(default)]
    pub at: Option<FireTimes>,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub kwargs: Map<String, Value>,
    #[serde(default)]
    pub options: Map<String, Value>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl ScheduleEntryConfig {
    /// Build the runtime entry, validating the trigger expressions
    pub fn to_entry(&self) -> Result<ScheduleEntry, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                entry: self.name.clone(),
                field: "name",
            });
        }
        if self.task.trim().is_empty() {
            return Err(ConfigError::EmptyField {
                entry: self.name.clone(),
                field: "task",
            });
        }
        let fire_times = self.at.as_ref().map(|a| a.to_vec()).unwrap_or_default();
        let trigger =
            TriggerSpec::from_fire_times(&fire_times).map_err(|source| {
                ConfigError::InvalidTrigger {
                    entry: self.name.clone(),
                    source,
                }
            })?;

        let mut entry = ScheduleEntry::new(self.name.clone(), self.task.clone())
            .with_trigger(trigger)
            .with_args(self.args.clone())
            .with_kwargs(self.kwargs.clone())
            .with_options(self.options.clone());
        if let Some(key) = &self.key {
            entry = entry.with_key(EntryKey::new(key.clone()));
        }
        if !self.enabled {
            entry = entry.disabled();
        }
        Ok(entry)
    }
}

/// One `[[mail.server]]` definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MailServerConfig {
    pub alias: String,
    #[serde(default)]
    pub throttle: ThrottlePolicy,
}

impl MailServerConfig {
    /// Counter scope for this server: the explicit throttle key when
    /// set, otherwise the server's own alias
    pub fn throttle_key(&self) -> &str {
        self.throttle.key.as_deref().unwrap_or(&self.alias)
    }
}

/// Mail section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub server: Vec<MailServerConfig>,
}

/// Top-level configuration consumed by the core
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub schedule: Vec<ScheduleEntryConfig>,
    #[serde(default)]
    pub mail: MailConfig,
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        tracing::debug!(
            entries = config.schedule.len(),
            servers = config.mail.server.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Fail-fast validation of every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.tick_interval.is_zero() {
            return Err(ConfigError::NonPositiveTickInterval);
        }
        self.schedule_entries()?;

        let mut aliases = BTreeSet::new();
        for server in &self.mail.server {
            if server.alias.trim().is_empty() {
                return Err(ConfigError::EmptyServerAlias);
            }
            if !aliases.insert(server.alias.clone()) {
                return Err(ConfigError::DuplicateServerAlias(server.alias.clone()));
            }
            server
                .throttle
                .validate()
                .map_err(|source| ConfigError::InvalidThrottle {
                    alias: server.alias.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Build the runtime schedule entries, rejecting duplicate keys
    pub fn schedule_entries(&self) -> Result<Vec<ScheduleEntry>, ConfigError> {
        let mut seen = BTreeSet::new();
        let mut entries = Vec::with_capacity(self.schedule.len());
        for entry_config in &self.schedule {
            let entry = entry_config.to_entry()?;
            if !seen.insert(entry.key.clone()) {
                return Err(ConfigError::DuplicateEntryKey(entry.key.to_string()));
            }
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Look up a mail server by alias
    pub fn mail_server(&self, alias: &str) -> Option<&MailServerConfig> {
        self.mail.server.iter().find(|s| s.alias == alias)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
