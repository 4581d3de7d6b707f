// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::{Duration, SystemTime};

/// Expiration settings attached to a single stored value.
///
/// A value may expire at a fixed point in time, after a duration measured from the
/// moment it was stored, after a window of inactivity, or any combination of these.
/// Whichever deadline comes first wins. Options with no expiration at all mean
/// "let the caller's defaults decide"; see [`has_expiration`](Self::has_expiration).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use stash_tier::EntryOptions;
///
/// let options = EntryOptions::new()
///     .with_ttl(Duration::from_secs(300))
///     .with_sliding_expiration(Duration::from_secs(60));
///
/// assert!(options.has_expiration());
/// assert_eq!(options.sliding_expiration(), Some(Duration::from_secs(60)));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntryOptions {
    absolute_expiration: Option<SystemTime>,
    absolute_expiration_relative_to_now: Option<Duration>,
    sliding_expiration: Option<Duration>,
}

impl EntryOptions {
    /// Creates options with no expiration set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expires the value at a fixed point in time.
    #[must_use]
    pub fn with_absolute_expiration(mut self, at: SystemTime) -> Self {
        self.absolute_expiration = Some(at);
        self
    }

    /// Expires the value a fixed duration after it is stored.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.absolute_expiration_relative_to_now = Some(ttl);
        self
    }

    /// Expires the value once it has not been read or refreshed for `window`.
    ///
    /// A sliding window never extends a value past its absolute deadline.
    #[must_use]
    pub fn with_sliding_expiration(mut self, window: Duration) -> Self {
        self.sliding_expiration = Some(window);
        self
    }

    /// Returns the fixed expiration instant, if set.
    #[must_use]
    pub fn absolute_expiration(&self) -> Option<SystemTime> {
        self.absolute_expiration
    }

    /// Returns the expiration duration measured from the time of storing, if set.
    #[must_use]
    pub fn absolute_expiration_relative_to_now(&self) -> Option<Duration> {
        self.absolute_expiration_relative_to_now
    }

    /// Returns the inactivity window, if set.
    #[must_use]
    pub fn sliding_expiration(&self) -> Option<Duration> {
        self.sliding_expiration
    }

    /// Returns `true` if any kind of expiration has been specified.
    #[must_use]
    pub fn has_expiration(&self) -> bool {
        self.absolute_expiration.is_some() || self.absolute_expiration_relative_to_now.is_some() || self.sliding_expiration.is_some()
    }

    /// Computes the absolute deadline for a value stored at `stored_at`.
    ///
    /// Returns the earlier of the fixed instant and `stored_at + ttl`, or `None` when
    /// neither is set. Sliding expiration is not part of the absolute deadline.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::{Duration, SystemTime};
    ///
    /// use stash_tier::EntryOptions;
    ///
    /// let stored_at = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
    /// let options = EntryOptions::new()
    ///     .with_absolute_expiration(stored_at + Duration::from_secs(30))
    ///     .with_ttl(Duration::from_secs(60));
    ///
    /// assert_eq!(options.absolute_deadline(stored_at), Some(stored_at + Duration::from_secs(30)));
    /// ```
    #[must_use]
    pub fn absolute_deadline(&self, stored_at: SystemTime) -> Option<SystemTime> {
        let relative = self
            .absolute_expiration_relative_to_now
            .and_then(|ttl| stored_at.checked_add(ttl));

        match (self.absolute_expiration, relative) {
            (Some(fixed), Some(relative)) => Some(fixed.min(relative)),
            (fixed, relative) => fixed.or(relative),
        }
    }
}
