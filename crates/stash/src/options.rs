// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Process-wide cache configuration.

use std::time::{Duration, SystemTime};

use serde::Deserialize;

/// Payloads at or above this many bytes are gzip-compressed by default.
pub const DEFAULT_COMPRESSION_THRESHOLD: usize = 2048;

/// Values expire this long after being stored unless the caller says otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Configuration for a [`Stash`](crate::Stash).
///
/// Deserializable from any serde source using camelCase keys; every field is
/// optional and falls back to its default. Durations are given in seconds.
///
/// Default expiration applies only to writes whose caller supplied no expiration
/// at all. When both defaults are set the absolute instant wins; when both are
/// cleared values do not expire.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use stash::StashOptions;
///
/// let options: StashOptions = serde_json::from_str(
///     r#"{ "compressionThresholdBytes": 4096, "absoluteExpirationRelativeToNow": 60 }"#,
/// )
/// .unwrap();
///
/// assert_eq!(options.compression_threshold_bytes(), 4096);
/// assert_eq!(options.absolute_expiration_relative_to_now(), Some(Duration::from_secs(60)));
/// assert_eq!(options.absolute_expiration(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StashOptions {
    compression_threshold_bytes: usize,
    absolute_expiration: Option<SystemTime>,
    #[serde(deserialize_with = "secs::deserialize")]
    absolute_expiration_relative_to_now: Option<Duration>,
}

impl Default for StashOptions {
    fn default() -> Self {
        Self {
            compression_threshold_bytes: DEFAULT_COMPRESSION_THRESHOLD,
            absolute_expiration: None,
            absolute_expiration_relative_to_now: Some(DEFAULT_TTL),
        }
    }
}

impl StashOptions {
    /// Creates options with the default threshold and a five minute default TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the payload size at which compression kicks in.
    #[must_use]
    pub fn with_compression_threshold(mut self, bytes: usize) -> Self {
        self.compression_threshold_bytes = bytes;
        self
    }

    /// Sets or clears the default fixed expiration instant.
    #[must_use]
    pub fn with_absolute_expiration(mut self, at: Option<SystemTime>) -> Self {
        self.absolute_expiration = at;
        self
    }

    /// Sets or clears the default time-to-live.
    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.absolute_expiration_relative_to_now = ttl;
        self
    }

    /// Returns the compression threshold in bytes.
    #[must_use]
    pub fn compression_threshold_bytes(&self) -> usize {
        self.compression_threshold_bytes
    }

    /// Returns the default fixed expiration instant.
    #[must_use]
    pub fn absolute_expiration(&self) -> Option<SystemTime> {
        self.absolute_expiration
    }

    /// Returns the default time-to-live.
    #[must_use]
    pub fn absolute_expiration_relative_to_now(&self) -> Option<Duration> {
        self.absolute_expiration_relative_to_now
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}
