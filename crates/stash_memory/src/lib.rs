// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! In-process byte store backed by moka.
//!
//! This crate provides [`InMemoryStore`], a concurrent [`ByteStore`](stash_tier::ByteStore)
//! that honors per-entry [`EntryOptions`](stash_tier::EntryOptions): absolute deadlines,
//! durations measured from the time of storing, and sliding windows of inactivity.
//! Expiration is evaluated against a [`tick::Clock`], so tests can move time forward
//! deterministically.
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//!
//! use stash_memory::InMemoryStore;
//! use stash_tier::{ByteStore, EntryOptions};
//! use tick::ClockControl;
//!
//! # futures::executor::block_on(async {
//! let control = ClockControl::new();
//! let store = InMemoryStore::builder(control.to_clock()).max_capacity(1000).build();
//!
//! let options = EntryOptions::new().with_ttl(Duration::from_secs(60));
//! store.set("key", b"value".to_vec(), options).await.unwrap();
//! assert_eq!(store.get("key").await.unwrap(), Some(b"value".to_vec()));
//!
//! control.advance(Duration::from_secs(61));
//! assert_eq!(store.get("key").await.unwrap(), None);
//! # });
//! ```

pub mod builder;
mod entry;
pub mod store;

#[doc(inline)]
pub use builder::InMemoryStoreBuilder;
#[doc(inline)]
pub use store::InMemoryStore;
