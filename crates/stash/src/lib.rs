// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A typed cache over byte stores.
//!
//! `stash` turns any [`ByteStore`](stash_tier::ByteStore) into a cache of typed values.
//! Values are wrapped in a small self-describing envelope: one flag byte saying whether
//! the payload is text or JSON and whether it is gzip-compressed, followed by the payload.
//! Large payloads are compressed automatically.
//!
//! The crate is layered:
//!
//! - [`EnvelopeCodec`] encodes and decodes envelopes.
//! - [`StoreAdapter`] wraps a byte store and applies the default expiration to writes
//!   that do not specify their own.
//! - [`Stash`] combines the two into `get`/`set` of typed values.
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//!
//! use serde::{Deserialize, Serialize};
//! use stash::{Stash, StashOptions};
//! use stash_memory::InMemoryStore;
//! use stash_tier::EntryOptions;
//! use tick::Clock;
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Planet {
//!     name: String,
//!     dimension: String,
//! }
//!
//! # futures::executor::block_on(async {
//! let clock = Clock::new_frozen();
//! let stash = Stash::builder(InMemoryStore::new(clock.clone()), clock)
//!     .options(StashOptions::new().with_default_ttl(Some(Duration::from_secs(60))))
//!     .build();
//!
//! let earth = Planet { name: "Earth".into(), dimension: "C-137".into() };
//! stash.set("planet", &earth, None).await.unwrap();
//! assert_eq!(stash.get::<Planet>("planet").await.unwrap(), Some(earth));
//!
//! // Explicit expiration is passed through unchanged.
//! let sliding = EntryOptions::new().with_sliding_expiration(Duration::from_secs(5));
//! stash.set("greeting", &"hello".to_owned(), Some(sliding)).await.unwrap();
//! # });
//! ```
//!
//! # Features
//!
//! - `metrics`: emit operation counters and durations through OpenTelemetry
//! - `test-util`: enable the mock store and controllable clocks of the underlying crates

mod adapter;
mod builder;
mod envelope;
pub mod error;
mod options;
mod stash;
mod telemetry;

#[doc(inline)]
pub use adapter::StoreAdapter;
#[doc(inline)]
pub use builder::StashBuilder;
#[doc(inline)]
pub use envelope::{EnvelopeCodec, Flag};
#[doc(inline)]
pub use error::{Error, ErrorKind, Result};
#[doc(inline)]
pub use options::{DEFAULT_COMPRESSION_THRESHOLD, DEFAULT_TTL, StashOptions};
#[doc(inline)]
pub use stash::Stash;
