// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Byte store implementation using moka.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;
use moka::ops::compute::Op;
use stash_tier::{ByteStore, EntryOptions, Error};
use tick::Clock;

use crate::builder::InMemoryStoreBuilder;
use crate::entry::StoredEntry;

/// An in-process [`ByteStore`] backed by moka.
///
/// Per-entry expiration is checked against the store's clock: an expired value is
/// reported as absent and dropped on the read that discovers it, and [`sync`](Self::sync)
/// drops every expired value. Each entry's lifetime is also handed to moka, which
/// reclaims values that are never read again. Reads and refreshes renew sliding windows.
///
/// Clones share the same underlying storage.
///
/// # Examples
///
/// ```
/// use stash_memory::InMemoryStore;
/// use stash_tier::{ByteStore, EntryOptions};
/// use tick::Clock;
///
/// # futures::executor::block_on(async {
/// let store = InMemoryStore::new(Clock::new_frozen());
///
/// store.set("key", vec![1, 2, 3], EntryOptions::new()).await.unwrap();
/// assert_eq!(store.get("key").await.unwrap(), Some(vec![1, 2, 3]));
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    inner: Arc<Cache<String, StoredEntry>>,
    clock: Clock,
}

impl InMemoryStore {
    /// Creates a store with no capacity limit.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self::builder(clock).build()
    }

    /// Creates a builder for configuring a store.
    #[must_use]
    pub fn builder(clock: Clock) -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::new(clock)
    }

    pub(crate) fn from_builder(builder: InMemoryStoreBuilder) -> Self {
        let mut moka_builder = Cache::builder();

        if let Some(capacity) = builder.max_capacity {
            moka_builder = moka_builder.max_capacity(capacity);
        }

        if let Some(capacity) = builder.initial_capacity {
            moka_builder = moka_builder.initial_capacity(capacity);
        }

        if let Some(name) = builder.name.as_deref() {
            moka_builder = moka_builder.name(name);
        }

        moka_builder = moka_builder.expire_after(EntryExpiry {
            clock: builder.clock.clone(),
        });

        Self {
            inner: Arc::new(moka_builder.build()),
            clock: builder.clock,
        }
    }

    /// Returns the approximate number of stored values, including expired values
    /// that have not been discovered yet.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Drops every value that has expired by the store's clock and applies pending
    /// maintenance, so that [`entry_count`](Self::entry_count) is accurate.
    pub async fn sync(&self) {
        let now = self.clock.system_time();
        let expired: Vec<_> = self.inner.iter().filter(|(_, entry)| entry.is_expired(now)).collect();

        for (key, entry) in expired {
            self.remove_if_same(&key, &entry).await;
        }

        self.inner.run_pending_tasks().await;
    }

    /// Returns the clock used for expiration checks.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    async fn live_entry(&self, key: &str) -> Option<StoredEntry> {
        let entry = self.inner.get(key).await?;
        let now = self.clock.system_time();

        if entry.is_expired(now) {
            self.remove_if_same(key, &entry).await;
            return None;
        }

        entry.touch(now);
        Some(entry)
    }

    /// Removes `expected` unless a concurrent `set` has replaced it.
    async fn remove_if_same(&self, key: &str, expected: &StoredEntry) {
        let _ = self
            .inner
            .entry_by_ref(key)
            .and_compute_with(|current| {
                let op = match current {
                    Some(current) if current.value().is_same(expected) => Op::Remove,
                    _ => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;
    }
}

/// Hands each entry's remaining lifetime, as measured by the store's clock, to moka.
#[derive(Debug)]
struct EntryExpiry {
    clock: Clock,
}

impl Expiry<String, StoredEntry> for EntryExpiry {
    fn expire_after_create(&self, _key: &String, value: &StoredEntry, _created_at: Instant) -> Option<Duration> {
        value.time_to_live(self.clock.system_time())
    }

    fn expire_after_read(
        &self,
        _key: &String,
        value: &StoredEntry,
        _read_at: Instant,
        _duration_until_expiry: Option<Duration>,
        _last_modified_at: Instant,
    ) -> Option<Duration> {
        value.time_to_live(self.clock.system_time())
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.time_to_live(self.clock.system_time())
    }
}

impl ByteStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.live_entry(key).await.map(|entry| entry.to_vec()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, options: EntryOptions) -> Result<(), Error> {
        let entry = StoredEntry::new(value, &options, self.clock.system_time());
        self.inner.insert(key.to_owned(), entry).await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    async fn refresh(&self, key: &str) -> Result<(), Error> {
        let _ = self.live_entry(key).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn stale_entry_does_not_remove_newer_value() {
        block_on(async {
            let store = InMemoryStore::new(Clock::new_frozen());
            store.set("key", vec![1], EntryOptions::new()).await.expect("error on set");
            let stale = store.inner.get("key").await.expect("entry present");

            store.set("key", vec![2], EntryOptions::new()).await.expect("error on set");
            store.remove_if_same("key", &stale).await;

            assert_eq!(store.get("key").await.expect("error on get"), Some(vec![2]));
        });
    }

    #[test]
    fn entry_is_removed_when_unchanged() {
        block_on(async {
            let store = InMemoryStore::new(Clock::new_frozen());
            store.set("key", vec![1], EntryOptions::new()).await.expect("error on set");
            let stale = store.inner.get("key").await.expect("entry present");

            store.remove_if_same("key", &stale).await;
            store.sync().await;

            assert_eq!(store.entry_count(), 0);
        });
    }
}
