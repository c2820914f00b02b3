// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule registry: the authoritative set of active entries
//!
//! Entries are keyed by `EntryKey` in a `BTreeMap`, so iteration (and
//! therefore same-tick dispatch order) is deterministic and key-sorted.
//! Re-registering under an existing key replaces the prior definition and
//! resets its lifetime clock.

use super::{EntryKey, ScheduleEntry};
use crate::clock::Clock;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

/// A registered entry together with its last registration time
#[derive(Debug, Clone, PartialEq)]
pub struct Registered {
    pub entry: ScheduleEntry,
    pub registered_at: DateTime<Utc>,
}

/// The authoritative set of currently registered schedule entries
#[derive(Debug, Clone, Default)]
pub struct ScheduleRegistry {
    entries: BTreeMap<EntryKey, Registered>,
    /// Entries older than this are expired; `None` disables expiration
    lifetime: Option<Duration>,
}

impl ScheduleRegistry {
    pub fn new(lifetime: Option<Duration>) -> Self {
        Self {
            entries: BTreeMap::new(),
            lifetime,
        }
    }

    /// Insert or replace the entry under its key, stamping its
    /// registration time. Returns the replaced entry, if any.
    pub fn upsert(&mut self, entry: ScheduleEntry, clock: &impl Clock) -> Option<ScheduleEntry> {
        let key = entry.key.clone();
        let registered = Registered {
            entry,
            registered_at: clock.now(),
        };
        self.entries
            .insert(key, registered)
            .map(|prior| prior.entry)
    }

    /// Remove the entry under `key`; no error if absent
    pub fn remove(&mut self, key: &EntryKey) -> Option<ScheduleEntry> {
        self.entries.remove(key).map(|r| r.entry)
    }

    pub fn get(&self, key: &EntryKey) -> Option<&Registered> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enabled, unexpired entries in key order
    pub fn list_active(&self, now: DateTime<Utc>) -> Vec<&ScheduleEntry> {
        self.entries
            .values()
            .filter(|r| r.entry.enabled && !self.is_expired(r, now))
            .map(|r| &r.entry)
            .collect()
    }

    /// Remove and return all entries whose lifetime has elapsed.
    ///
    /// Called once per tick before trigger evaluation, so an expired
    /// entry never fires in the tick it expires.
    pub fn expire(&mut self, now: DateTime<Utc>) -> Vec<Registered> {
        let expired_keys: Vec<EntryKey> = self
            .entries
            .iter()
            .filter(|(_, r)| self.is_expired(r, now))
            .map(|(k, _)| k.clone())
            .collect();
        expired_keys
            .iter()
            .filter_map(|k| self.entries.remove(k))
            .collect()
    }

    fn is_expired(&self, registered: &Registered, now: DateTime<Utc>) -> bool {
        match self.lifetime {
            Some(lifetime) => now - registered.registered_at > lifetime,
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
