// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Byte store abstractions for building cache backends.
//!
//! This crate defines the [`ByteStore`] trait that every raw cache backend must satisfy,
//! along with [`EntryOptions`] describing how long a stored value lives and the [`Error`]
//! type for fallible store operations.
//!
//! A byte store knows nothing about the values it holds: keys are opaque strings and
//! values are opaque byte sequences. Encoding, compression and default expiration policy
//! live one layer up, in the `stash` crate.
//!
//! # Implementing a Byte Store
//!
//! ```
//! use std::collections::HashMap;
//! use std::sync::RwLock;
//!
//! use stash_tier::{ByteStore, EntryOptions, Error};
//!
//! struct MapStore(RwLock<HashMap<String, Vec<u8>>>);
//!
//! impl ByteStore for MapStore {
//!     async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
//!         Ok(self.0.read().unwrap().get(key).cloned())
//!     }
//!
//!     async fn set(&self, key: &str, value: Vec<u8>, _options: EntryOptions) -> Result<(), Error> {
//!         self.0.write().unwrap().insert(key.to_owned(), value);
//!         Ok(())
//!     }
//!
//!     async fn remove(&self, key: &str) -> Result<(), Error> {
//!         self.0.write().unwrap().remove(key);
//!         Ok(())
//!     }
//!
//!     async fn refresh(&self, _key: &str) -> Result<(), Error> {
//!         Ok(())
//!     }
//! }
//! ```

pub mod error;
mod options;
mod store;
#[cfg(any(feature = "test-util", test))]
pub mod testing;

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use options::EntryOptions;
#[doc(inline)]
pub use store::ByteStore;
