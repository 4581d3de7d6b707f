// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Read-through paginated queries.

use serde::{Deserialize, Serialize};
use stash::Stash;
use stash_tier::ByteStore;

use crate::keys::non_blank;
use crate::{CacheKeys, CharacterResponse, CharacterSource, Result};

/// Largest page size [`CharacterQuery::clamped`] allows.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size of the default query.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A request for one page of characters, optionally restricted to a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterQuery {
    /// Only characters at this location; blank means every character.
    pub location: Option<String>,
    /// One-based page number.
    pub page_number: u32,
    /// Items per page.
    pub page_size: u32,
}

impl Default for CharacterQuery {
    fn default() -> Self {
        Self {
            location: None,
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CharacterQuery {
    /// Restricts the query to one location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Selects a page.
    #[must_use]
    pub fn with_page(mut self, page_number: u32, page_size: u32) -> Self {
        self.page_number = page_number;
        self.page_size = page_size;
        self
    }

    /// Returns the query with the page number raised to at least `1` and the page size
    /// kept within `1..=100`.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog::CharacterQuery;
    ///
    /// let query = CharacterQuery::default().with_page(0, 500).clamped();
    /// assert_eq!((query.page_number, query.page_size), (1, 100));
    /// ```
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.page_number = self.page_number.max(1);
        self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }
}

/// One page of a larger collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// One-based page number as requested.
    pub page_number: u32,
    /// Page size as requested.
    pub page_size: u32,
    /// Length of the whole collection, not just this page.
    pub total_count: usize,
    /// `true` when the collection came from the cache.
    pub served_from_cache: bool,
}

impl<T: Clone> Page<T> {
    /// Cuts page `page_number` of size `page_size` out of `all`.
    ///
    /// Page `0` is treated as page `1`, and pages past the end are empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog::Page;
    ///
    /// let page = Page::paginate(&[1, 2, 3, 4, 5], 2, 2, true);
    /// assert_eq!(page.items, [3, 4]);
    /// assert_eq!(page.total_count, 5);
    /// assert_eq!(page.total_pages(), 3);
    /// ```
    #[must_use]
    pub fn paginate(all: &[T], page_number: u32, page_size: u32, served_from_cache: bool) -> Self {
        let size = to_usize(page_size);
        let skip = to_usize(page_number.saturating_sub(1)).saturating_mul(size);
        let items = all.iter().skip(skip).take(size).cloned().collect();

        Self {
            items,
            page_number,
            page_size,
            total_count: all.len(),
            served_from_cache,
        }
    }
}

impl<T> Page<T> {
    /// Returns the number of pages of `page_size` the whole collection spans.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        match self.page_size {
            0 => 0,
            size => self.total_count.div_ceil(to_usize(size)),
        }
    }
}

fn to_usize(n: u32) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

/// Serves [`CharacterQuery`] requests from the cache, falling back to the source.
///
/// On a miss the whole matching collection is loaded, cached under the query's key with
/// the default expiration, and paginated in memory. Later pages and other page sizes
/// for the same location are then served from the cache until it expires.
///
/// Concurrent misses on the same key each load and write the collection; the last
/// write wins. Dropping the future before the load completes leaves the cache
/// untouched.
#[derive(Debug)]
pub struct ReadThroughHandler<S, B> {
    source: S,
    stash: Stash<B>,
    keys: CacheKeys,
}

impl<S, B> ReadThroughHandler<S, B>
where
    S: CharacterSource,
    B: ByteStore,
{
    /// Creates a handler using the default key namespace.
    #[must_use]
    pub fn new(source: S, stash: Stash<B>) -> Self {
        Self::with_keys(source, stash, CacheKeys::default())
    }

    /// Creates a handler using the given key namespace.
    #[must_use]
    pub fn with_keys(source: S, stash: Stash<B>, keys: CacheKeys) -> Self {
        Self { source, stash, keys }
    }

    /// Returns the key namespace.
    #[must_use]
    pub fn keys(&self) -> &CacheKeys {
        &self.keys
    }

    /// Serves one page.
    ///
    /// The page bounds are used as given; see [`CharacterQuery::clamped`].
    ///
    /// # Errors
    ///
    /// Returns a [`Cache`](crate::ErrorKind::Cache) error if the cache fails and a
    /// [`Source`](crate::ErrorKind::Source) error if loading the collection fails.
    pub async fn handle(&self, query: &CharacterQuery) -> Result<Page<CharacterResponse>> {
        let location = non_blank(query.location.as_deref());
        let key = self.keys.for_location(location);

        if let Some(cached) = self.stash.get::<Vec<CharacterResponse>>(&key).await? {
            tracing::debug!(key = %key, count = cached.len(), "characters served from cache");
            return Ok(Page::paginate(&cached, query.page_number, query.page_size, true));
        }

        let loaded = match location {
            Some(location) => self.source.get_by_location(location).await,
            None => self.source.get_all().await,
        }?;

        let all: Vec<CharacterResponse> = loaded.iter().map(CharacterResponse::from).collect();
        self.stash.set(&key, &all, None).await?;
        tracing::debug!(key = %key, count = all.len(), "characters loaded from source and cached");

        Ok(Page::paginate(&all, query.page_number, query.page_size, false))
    }
}
