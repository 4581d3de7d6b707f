// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for raw byte cache backends.
//!
//! [`ByteStore`] is the single point of coupling to a concrete cache backend,
//! whether that is a map in process memory or a networked cache service.

use std::sync::Arc;

use crate::{EntryOptions, Error};

/// Trait for byte-oriented key/value cache backends.
///
/// Implementations store opaque byte sequences under opaque string keys. They must
/// make a single-key `set` atomic: readers observe either the previous value or the
/// new one, never a mix. No other ordering is expected; concurrent writers to the
/// same key race and the last write wins.
///
/// All four methods are required:
/// - `get`: returns the stored bytes, or `None` when absent or expired
/// - `set`: stores bytes with the given expiration options, used verbatim
/// - `remove`: deletes the value if present
/// - `refresh`: renews a sliding expiration window without reading the value
pub trait ByteStore: Send + Sync {
    /// Gets the bytes stored under `key`.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>, Error>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Vec<u8>, options: EntryOptions) -> impl Future<Output = Result<(), Error>> + Send;

    /// Removes the value stored under `key`.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), Error>> + Send;

    /// Renews the sliding expiration of the value stored under `key`.
    fn refresh(&self, key: &str) -> impl Future<Output = Result<(), Error>> + Send;
}

impl<T> ByteStore for Arc<T>
where
    T: ByteStore,
{
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Vec<u8>>, Error>> + Send {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>, options: EntryOptions) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).set(key, value, options)
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).remove(key)
    }

    fn refresh(&self, key: &str) -> impl Future<Output = Result<(), Error>> + Send {
        (**self).refresh(key)
    }
}
