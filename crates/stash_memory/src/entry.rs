// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use stash_tier::EntryOptions;

/// A stored value together with its resolved expiration state.
///
/// Clones share the last-access timestamp, so touching a clone handed out by the
/// underlying cache renews the sliding window of the stored entry.
#[derive(Debug, Clone)]
pub(crate) struct StoredEntry {
    value: Arc<[u8]>,
    absolute_deadline: Option<SystemTime>,
    sliding_expiration: Option<Duration>,
    last_access: Arc<Mutex<SystemTime>>,
}

impl StoredEntry {
    pub(crate) fn new(value: Vec<u8>, options: &EntryOptions, now: SystemTime) -> Self {
        Self {
            value: value.into(),
            absolute_deadline: options.absolute_deadline(now),
            sliding_expiration: options.sliding_expiration(),
            last_access: Arc::new(Mutex::new(now)),
        }
    }

    pub(crate) fn to_vec(&self) -> Vec<u8> {
        self.value.to_vec()
    }

    pub(crate) fn is_expired(&self, now: SystemTime) -> bool {
        if self.absolute_deadline.is_some_and(|deadline| now >= deadline) {
            return true;
        }

        self.sliding_expiration.is_some_and(|window| {
            let last_access = *self.last_access.lock();
            last_access.checked_add(window).is_some_and(|deadline| now >= deadline)
        })
    }

    /// Returns how long the entry lives if accessed at `now`, or `None` if it never expires.
    pub(crate) fn time_to_live(&self, now: SystemTime) -> Option<Duration> {
        let absolute = self
            .absolute_deadline
            .map(|deadline| deadline.duration_since(now).unwrap_or(Duration::ZERO));

        match (absolute, self.sliding_expiration) {
            (Some(absolute), Some(window)) => Some(absolute.min(window)),
            (absolute, window) => absolute.or(window),
        }
    }

    /// Returns `true` if both entries hold the same stored value, not merely equal bytes.
    pub(crate) fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }

    pub(crate) fn touch(&self, now: SystemTime) {
        if self.sliding_expiration.is_some() {
            *self.last_access.lock() = now;
        }
    }
}
