// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule entry model
//!
//! A `ScheduleEntry` is an immutable description of one recurring job:
//! what to invoke, when, and with which arguments. Registration state
//! (the "last registered" timestamp) lives in the registry, not here.

use super::TriggerSpec;
use serde_json::{Map, Value};
use std::fmt;

/// Stable identifier for a schedule entry within the registry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryKey(pub String);

impl EntryKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derive a key from a human-readable name: lower-cased, whitespace
    /// collapsed to single dashes.
    pub fn derive(name: &str) -> Self {
        let slug = name
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect::<Vec<_>>()
            .join("-");
        Self(slug)
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntryKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntryKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Immutable description of one recurring job
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    /// Registry key; derived from `name` unless set explicitly
    pub key: EntryKey,
    /// Human-readable label
    pub name: String,
    /// Identifier of the unit of work to invoke
    pub task: String,
    /// When the entry fires
    pub trigger: TriggerSpec,
    /// Positional arguments forwarded verbatim to the task invocation
    pub args: Vec<Value>,
    /// Keyword arguments forwarded verbatim to the task invocation
    pub kwargs: Map<String, Value>,
    /// Dispatch options forwarded to the dispatch client
    pub options: Map<String, Value>,
    /// Disabled entries remain registered but never fire
    pub enabled: bool,
}

impl ScheduleEntry {
    /// Create an entry with the key derived from `name`, firing every
    /// tick, enabled, with no arguments.
    pub fn new(name: impl Into<String>, task: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: EntryKey::derive(&name),
            name,
            task: task.into(),
            trigger: TriggerSpec::EveryTick,
            args: Vec::new(),
            kwargs: Map::new(),
            options: Map::new(),
            enabled: true,
        }
    }

    pub fn with_key(mut self, key: impl Into<EntryKey>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_trigger(mut self, trigger: TriggerSpec) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn with_kwargs(mut self, kwargs: Map<String, Value>) -> Self {
        self.kwargs = kwargs;
        self
    }

    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        self.options = options;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
