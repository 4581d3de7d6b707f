// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builder for configuring in-memory stores.
//!
//! The builder keeps moka out of the public API surface.

use tick::Clock;

use crate::store::InMemoryStore;

/// Builder for configuring an [`InMemoryStore`].
///
/// # Examples
///
/// ```
/// use stash_memory::InMemoryStore;
/// use tick::Clock;
///
/// let store = InMemoryStore::builder(Clock::new_frozen())
///     .max_capacity(10_000)
///     .initial_capacity(100)
///     .name("characters")
///     .build();
/// ```
#[derive(Debug)]
pub struct InMemoryStoreBuilder {
    pub(crate) clock: Clock,
    pub(crate) max_capacity: Option<u64>,
    pub(crate) initial_capacity: Option<usize>,
    pub(crate) name: Option<String>,
}

impl InMemoryStoreBuilder {
    pub(crate) fn new(clock: Clock) -> Self {
        Self {
            clock,
            max_capacity: None,
            initial_capacity: None,
            name: None,
        }
    }

    /// Sets the maximum number of stored values.
    ///
    /// Once the capacity is reached, values are evicted using moka's `TinyLFU` policy.
    /// If not set, the store is unbounded.
    #[must_use]
    pub fn max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = Some(capacity);
        self
    }

    /// Sets the pre-allocation hint for the store.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Sets a name that may appear in debugging output of the underlying cache.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builds the configured [`InMemoryStore`].
    #[must_use]
    pub fn build(self) -> InMemoryStore {
        InMemoryStore::from_builder(self)
    }
}
