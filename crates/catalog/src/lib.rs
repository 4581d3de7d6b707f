// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A character catalog fronted by a cache-aside cache.
//!
//! Reads go through [`ReadThroughHandler`]: a query is answered from the cached
//! collection for its location, or, on a miss, the whole collection is loaded from the
//! [`CharacterSource`], cached and paginated in memory. Creations go through
//! [`CreateCharacterHandler`], which persists the character and hands its
//! [`CharacterCreated`] event to [`WriteAsideHandler`]. That handler appends the new
//! record to the cached collections that already exist instead of invalidating them.
//!
//! Collections are cached under keys from [`CacheKeys`]: `characters` for every
//! character and `characters_{location}` per location, lower-cased.
//!
//! # Example
//!
//! ```
//! use catalog::{
//!     CharacterCreateRequest, CharacterQuery, CreateCharacterHandler, MemorySource, ReadThroughHandler,
//!     WriteAsideHandler,
//! };
//! use stash::{Stash, StashOptions};
//! use stash_memory::InMemoryStore;
//! use tick::Clock;
//!
//! # futures::executor::block_on(async {
//! let clock = Clock::new_frozen();
//! let stash = Stash::new(InMemoryStore::new(clock.clone()), StashOptions::default(), clock);
//! let source = MemorySource::new();
//!
//! let queries = ReadThroughHandler::new(source.clone(), stash.clone());
//! let create = CreateCharacterHandler::new(source.clone(), WriteAsideHandler::new(stash));
//!
//! let first = queries.handle(&CharacterQuery::default()).await.unwrap();
//! assert!(!first.served_from_cache);
//! assert_eq!(first.total_count, 0);
//!
//! create
//!     .handle(CharacterCreateRequest::new("Rick Sanchez", "Human", "Male").with_location("Earth (C-137)"))
//!     .await
//!     .unwrap();
//!
//! let second = queries.handle(&CharacterQuery::default()).await.unwrap();
//! assert!(second.served_from_cache);
//! assert_eq!(second.items[0].name, "Rick Sanchez");
//! # });
//! ```

mod character;
mod commands;
mod contracts;
pub mod error;
mod events;
mod keys;
mod query;
mod source;

#[doc(inline)]
pub use character::{Character, CharacterCreated, CharacterEvent};
#[doc(inline)]
pub use commands::{CreateCharacterHandler, CreateCharactersHandler};
#[doc(inline)]
pub use contracts::{CharacterCreateRequest, CharacterResponse};
#[doc(inline)]
pub use error::{Error, ErrorKind, Result};
#[doc(inline)]
pub use events::{PatchOutcome, PatchReport, WriteAsideHandler};
#[doc(inline)]
pub use keys::{CacheKeys, DEFAULT_BASE_KEY};
#[doc(inline)]
pub use query::{CharacterQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, ReadThroughHandler};
#[doc(inline)]
pub use source::{CharacterSource, MemorySource};
