// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The typed cache facade.

use std::any::Any;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use stash_tier::{ByteStore, EntryOptions};
use tick::Clock;

use crate::builder::StashBuilder;
use crate::telemetry::ext::ClockExt;
use crate::telemetry::{StashActivity, StashOperation, StashTelemetry};
use crate::{EnvelopeCodec, Result, StashOptions, StoreAdapter};

/// A typed cache over a [`ByteStore`].
///
/// `Stash` encodes values into self-describing envelopes with [`EnvelopeCodec`] and
/// stores them through a [`StoreAdapter`], which fills in the default expiration when a
/// write specifies none. Every read builds a fresh value from the stored bytes; nothing
/// is shared between callers.
///
/// Construct one per store and pass it to whatever needs it.
///
/// # Examples
///
/// ```
/// use stash::{Stash, StashOptions};
/// use stash_memory::InMemoryStore;
/// use tick::Clock;
///
/// # futures::executor::block_on(async {
/// let clock = Clock::new_frozen();
/// let stash = Stash::new(InMemoryStore::new(clock.clone()), StashOptions::default(), clock);
///
/// stash.set("answer", &42_u32, None).await.unwrap();
/// assert_eq!(stash.get::<u32>("answer").await.unwrap(), Some(42));
/// assert_eq!(stash.get::<u32>("question").await.unwrap(), None);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct Stash<S> {
    adapter: StoreAdapter<S>,
    codec: EnvelopeCodec,
    telemetry: StashTelemetry,
    clock: Clock,
}

impl<S: ByteStore> Stash<S> {
    /// Creates a facade over `store` with the given options and logging enabled.
    #[must_use]
    pub fn new(store: S, options: StashOptions, clock: Clock) -> Self {
        Self::builder(store, clock).options(options).build()
    }

    /// Creates a builder for a facade over `store`.
    #[must_use]
    pub fn builder(store: S, clock: Clock) -> StashBuilder<S> {
        StashBuilder::new(store, clock)
    }

    pub(crate) fn from_parts(adapter: StoreAdapter<S>, codec: EnvelopeCodec, telemetry: StashTelemetry, clock: Clock) -> Self {
        Self {
            adapter,
            codec,
            telemetry,
            clock,
        }
    }

    /// Returns the name reported in logs and metrics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.telemetry.name()
    }

    /// Returns the codec used for envelopes.
    #[must_use]
    pub fn codec(&self) -> &EnvelopeCodec {
        &self.codec
    }

    /// Returns the underlying store adapter.
    #[must_use]
    pub fn adapter(&self) -> &StoreAdapter<S> {
        &self.adapter
    }

    /// Returns the clock used to time operations.
    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Gets the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing, or an empty envelope, is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the stored envelope cannot be decoded as `T`.
    pub async fn get<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Any,
    {
        let timed = self.clock.timed_async(self.adapter.get(key)).await;
        let decoded = timed.result.and_then(|bytes| match bytes {
            Some(bytes) => self.codec.decode::<T>(&bytes),
            None => Ok(None),
        });

        let activity = match &decoded {
            Ok(Some(_)) => StashActivity::Hit,
            Ok(None) => StashActivity::Miss,
            Err(_) => StashActivity::Error,
        };
        self.telemetry.record(key, StashOperation::Get, activity, timed.duration);

        decoded
    }

    /// Stores `value` under `key`.
    ///
    /// Text values (`String`, `&'static str`, `Box<str>`, `Cow<'static, str>`) are stored
    /// as text and everything else as JSON; see [`EnvelopeCodec::encode`].
    ///
    /// `options` with any expiration set are used as given; otherwise the configured
    /// default applies.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded or the store fails. Nothing is
    /// written when encoding fails.
    pub async fn set<T>(&self, key: &str, value: &T, options: Option<EntryOptions>) -> Result<()>
    where
        T: Serialize + Any,
    {
        let bytes = match self.codec.encode(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.telemetry
                    .record(key, StashOperation::Set, StashActivity::Error, Duration::ZERO);
                return Err(e);
            }
        };

        self.write(key, bytes, options).await
    }

    /// Stores a string slice under `key` as text.
    ///
    /// # Errors
    ///
    /// Returns an error if compression or the store fails.
    pub async fn set_str(&self, key: &str, value: &str, options: Option<EntryOptions>) -> Result<()> {
        let bytes = self.codec.encode_str(value)?;
        self.write(key, bytes, options).await
    }

    /// Removes the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let timed = self.clock.timed_async(self.adapter.remove(key)).await;
        self.record_outcome(key, StashOperation::Remove, StashActivity::Removed, &timed.result, timed.duration);
        timed.result
    }

    /// Renews the sliding expiration of the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn refresh(&self, key: &str) -> Result<()> {
        let timed = self.clock.timed_async(self.adapter.refresh(key)).await;
        self.record_outcome(key, StashOperation::Refresh, StashActivity::Refreshed, &timed.result, timed.duration);
        timed.result
    }

    async fn write(&self, key: &str, bytes: Vec<u8>, options: Option<EntryOptions>) -> Result<()> {
        let timed = self.clock.timed_async(self.adapter.set(key, bytes, options)).await;
        self.record_outcome(key, StashOperation::Set, StashActivity::Stored, &timed.result, timed.duration);
        timed.result
    }

    fn record_outcome(
        &self,
        key: &str,
        operation: StashOperation,
        success: StashActivity,
        result: &Result<()>,
        duration: Duration,
    ) {
        let activity = if result.is_ok() { success } else { StashActivity::Error };
        self.telemetry.record(key, operation, activity, duration);
    }
}
