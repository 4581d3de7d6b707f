// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Byte store adapter applying default expiration.

use futures::executor::block_on;
use stash_tier::{ByteStore, EntryOptions};

use crate::{Result, StashOptions};

/// Wraps a [`ByteStore`] and applies the configured default expiration to writes.
///
/// The adapter is the only place where default expiration policy lives: when a caller
/// passes options with any expiration set, they reach the store verbatim; otherwise
/// the adapter substitutes the configured default.
///
/// Every operation has an async form and a `*_blocking` form. The blocking forms drive
/// the async ones to completion on the current thread and must not be called from
/// within an async task.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use stash::{StashOptions, StoreAdapter};
/// use stash_tier::EntryOptions;
/// use stash_tier::testing::MockStore;
///
/// let adapter = StoreAdapter::new(MockStore::new(), StashOptions::default());
///
/// let resolved = adapter.resolve_options(None);
/// assert_eq!(resolved.absolute_expiration_relative_to_now(), Some(Duration::from_secs(300)));
///
/// let explicit = EntryOptions::new().with_sliding_expiration(Duration::from_secs(10));
/// assert_eq!(adapter.resolve_options(Some(explicit)), explicit);
/// ```
#[derive(Debug, Clone)]
pub struct StoreAdapter<S> {
    store: S,
    default_options: EntryOptions,
}

impl<S: ByteStore> StoreAdapter<S> {
    /// Creates an adapter over `store` using the expiration defaults from `options`.
    #[must_use]
    pub fn new(store: S, options: StashOptions) -> Self {
        Self {
            store,
            default_options: default_entry_options(&options),
        }
    }

    /// Returns the wrapped store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the options applied to writes that specify no expiration.
    #[must_use]
    pub fn default_options(&self) -> EntryOptions {
        self.default_options
    }

    /// Resolves the options a write actually uses.
    ///
    /// Options with any expiration set are returned unchanged; absent or empty options
    /// are replaced by the defaults.
    #[must_use]
    pub fn resolve_options(&self, options: Option<EntryOptions>) -> EntryOptions {
        options
            .filter(EntryOptions::has_expiration)
            .unwrap_or(self.default_options)
    }

    /// Gets the raw bytes stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Store`](crate::ErrorKind::Store) if the store fails.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.store.get(key).await?)
    }

    /// Stores raw bytes under `key` with the resolved expiration.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Store`](crate::ErrorKind::Store) if the store fails.
    pub async fn set(&self, key: &str, value: Vec<u8>, options: Option<EntryOptions>) -> Result<()> {
        let options = self.resolve_options(options);
        Ok(self.store.set(key, value, options).await?)
    }

    /// Removes the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Store`](crate::ErrorKind::Store) if the store fails.
    pub async fn remove(&self, key: &str) -> Result<()> {
        Ok(self.store.remove(key).await?)
    }

    /// Renews the sliding expiration of the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Store`](crate::ErrorKind::Store) if the store fails.
    pub async fn refresh(&self, key: &str) -> Result<()> {
        Ok(self.store.refresh(key).await?)
    }

    /// Blocking form of [`get`](Self::get).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Store`](crate::ErrorKind::Store) if the store fails.
    pub fn get_blocking(&self, key: &str) -> Result<Option<Vec<u8>>> {
        block_on(self.get(key))
    }

    /// Blocking form of [`set`](Self::set).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Store`](crate::ErrorKind::Store) if the store fails.
    pub fn set_blocking(&self, key: &str, value: Vec<u8>, options: Option<EntryOptions>) -> Result<()> {
        block_on(self.set(key, value, options))
    }

    /// Blocking form of [`remove`](Self::remove).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Store`](crate::ErrorKind::Store) if the store fails.
    pub fn remove_blocking(&self, key: &str) -> Result<()> {
        block_on(self.remove(key))
    }

    /// Blocking form of [`refresh`](Self::refresh).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Store`](crate::ErrorKind::Store) if the store fails.
    pub fn refresh_blocking(&self, key: &str) -> Result<()> {
        block_on(self.refresh(key))
    }
}

fn default_entry_options(options: &StashOptions) -> EntryOptions {
    if let Some(at) = options.absolute_expiration() {
        return EntryOptions::new().with_absolute_expiration(at);
    }

    match options.absolute_expiration_relative_to_now() {
        Some(ttl) => EntryOptions::new().with_ttl(ttl),
        None => EntryOptions::new(),
    }
}
