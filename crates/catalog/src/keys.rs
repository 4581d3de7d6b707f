// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Cache key namespace for character collections.

/// Base token of the default namespace.
pub const DEFAULT_BASE_KEY: &str = "characters";

/// Produces the cache keys under which character collections live.
///
/// The global key holds every character. Partition keys hold the characters of one
/// location and are formed as `{base}_{location}` with the location lower-cased, so
/// `Earth` and `EARTH` share a partition.
///
/// # Examples
///
/// ```
/// use catalog::CacheKeys;
///
/// let keys = CacheKeys::default();
/// assert_eq!(keys.global(), "characters");
/// assert_eq!(keys.partition("Citadel"), "characters_citadel");
/// assert_eq!(keys.for_location(Some("  ")), "characters");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeys {
    base: String,
}

impl Default for CacheKeys {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_KEY)
    }
}

impl CacheKeys {
    /// Creates a namespace with the given base token.
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Returns the key of the collection holding every character.
    #[must_use]
    pub fn global(&self) -> String {
        self.base.clone()
    }

    /// Returns the key of the collection for one location.
    #[must_use]
    pub fn partition(&self, location: &str) -> String {
        format!("{}_{}", self.base, location.to_lowercase())
    }

    /// Returns the partition key for a non-blank location and the global key otherwise.
    #[must_use]
    pub fn for_location(&self, location: Option<&str>) -> String {
        match non_blank(location) {
            Some(location) => self.partition(location),
            None => self.global(),
        }
    }
}

/// Returns the location unless it is absent, empty or whitespace.
pub(crate) fn non_blank(location: Option<&str>) -> Option<&str> {
    location.filter(|l| !l.trim().is_empty())
}
