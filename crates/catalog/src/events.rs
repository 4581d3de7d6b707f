// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Write-aside patching of cached collections.

use stash::Stash;
use stash_tier::ByteStore;

use crate::keys::non_blank;
use crate::{CacheKeys, CharacterCreated, CharacterResponse, Result};

/// What a patch did to one cached collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchOutcome {
    /// The record was appended and the collection written back.
    Appended,
    /// Nothing was cached under the key, so nothing was written.
    NotCached,
    /// The collection already held a record with the same id.
    AlreadyPresent,
}

/// The outcome of handling one [`CharacterCreated`] event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchReport {
    /// Outcome for the global collection.
    pub global: PatchOutcome,
    /// Outcome for the location collection, `None` when the record has no location.
    pub partition: Option<PatchOutcome>,
}

/// Appends newly created characters to the cached collections that should hold them.
///
/// The global collection is always patched and the collection for the character's
/// location is patched when it has one. Each patch reads the collection from the
/// store, appends the record unless its id is already there, and writes it back with
/// the default expiration. Collections that are not cached stay uncached; the next
/// read repopulates them from the source.
///
/// Two creations patching the same key at once can both read the same collection, and
/// the later write drops the earlier append. The next reload after expiry repairs it.
#[derive(Debug)]
pub struct WriteAsideHandler<B> {
    stash: Stash<B>,
    keys: CacheKeys,
}

impl<B: ByteStore> WriteAsideHandler<B> {
    /// Creates a handler using the default key namespace.
    #[must_use]
    pub fn new(stash: Stash<B>) -> Self {
        Self::with_keys(stash, CacheKeys::default())
    }

    /// Creates a handler using the given key namespace.
    #[must_use]
    pub fn with_keys(stash: Stash<B>, keys: CacheKeys) -> Self {
        Self { stash, keys }
    }

    /// Patches the cached collections for one created character.
    ///
    /// The two patches are independent: a missing global collection does not stop the
    /// location collection from being patched.
    ///
    /// # Errors
    ///
    /// Returns a [`Cache`](crate::ErrorKind::Cache) error if reading or writing either
    /// collection fails.
    pub async fn handle(&self, event: &CharacterCreated) -> Result<PatchReport> {
        let record = &event.character;

        let global = self.patch(&self.keys.global(), record).await?;

        let partition = match non_blank(record.location.as_deref()) {
            Some(location) => Some(self.patch(&self.keys.partition(location), record).await?),
            None => None,
        };

        Ok(PatchReport { global, partition })
    }

    async fn patch(&self, key: &str, record: &CharacterResponse) -> Result<PatchOutcome> {
        let Some(mut cached) = self.stash.get::<Vec<CharacterResponse>>(key).await? else {
            tracing::debug!(key, id = record.id, "collection not cached, skipping patch");
            return Ok(PatchOutcome::NotCached);
        };

        if cached.iter().any(|c| c.id == record.id) {
            tracing::debug!(key, id = record.id, "character already cached");
            return Ok(PatchOutcome::AlreadyPresent);
        }

        cached.push(record.clone());
        self.stash.set(key, &cached, None).await?;
        tracing::info!(key, id = record.id, count = cached.len(), "character appended to cached collection");

        Ok(PatchOutcome::Appended)
    }
}
