// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Recording byte store for testing.
//!
//! [`MockStore`] keeps values in a plain map, records every operation it receives
//! and can be told to fail selected operations, which makes it suitable for
//! testing both the happy paths and the error paths of code built on a [`ByteStore`].

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;

use crate::{ByteStore, EntryOptions, Error};

/// A store operation as recorded by [`MockStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// A get for the given key.
    Get(String),
    /// A set for the given key.
    Set {
        /// The key that was written.
        key: String,
        /// The bytes that were written.
        value: Vec<u8>,
        /// The expiration options the store received.
        options: EntryOptions,
    },
    /// A remove for the given key.
    Remove(String),
    /// A refresh for the given key.
    Refresh(String),
}

impl StoreOp {
    /// Returns the key this operation targeted.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Get(key) | Self::Remove(key) | Self::Refresh(key) => key,
            Self::Set { key, .. } => key,
        }
    }

    /// Returns `true` for write operations.
    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set { .. })
    }
}

type FailPredicate = Box<dyn Fn(&StoreOp) -> bool + Send + Sync>;

/// An in-memory byte store that records operations and injects failures.
///
/// Clones share the same data, operation log and failure predicate, so a test can
/// hand one clone to the code under test and inspect another.
///
/// Expiration options are recorded but never enforced; values live until removed.
///
/// # Examples
///
/// ```
/// use stash_tier::testing::{MockStore, StoreOp};
/// use stash_tier::{ByteStore, EntryOptions};
///
/// # futures::executor::block_on(async {
/// let store = MockStore::new();
///
/// store.set("key", b"value".to_vec(), EntryOptions::new()).await.unwrap();
/// assert_eq!(store.get("key").await.unwrap(), Some(b"value".to_vec()));
///
/// store.fail_when(|op| matches!(op, StoreOp::Get(_)));
/// assert!(store.get("key").await.is_err());
/// # });
/// ```
pub struct MockStore {
    data: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    operations: Arc<Mutex<Vec<StoreOp>>>,
    fail_when: Arc<Mutex<Option<FailPredicate>>>,
}

impl std::fmt::Debug for MockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockStore")
            .field("keys", &self.data.lock().keys().collect::<Vec<_>>())
            .field("operations", &self.operations.lock().len())
            .field("fail_when", &self.fail_when.lock().is_some())
            .finish()
    }
}

impl Clone for MockStore {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            operations: Arc::clone(&self.operations),
            fail_when: Arc::clone(&self.fail_when),
        }
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_data(HashMap::new())
    }

    /// Creates a store pre-populated with raw bytes.
    #[must_use]
    pub fn with_data(data: HashMap<String, Vec<u8>>) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_when: Arc::new(Mutex::new(None)),
        }
    }

    /// Writes raw bytes directly, bypassing the operation log.
    pub fn seed(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.data.lock().insert(key.into(), value.into());
    }

    /// Returns the raw bytes under `key` without recording an operation.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<Vec<u8>> {
        self.data.lock().get(key).cloned()
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns `true` if a value is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.lock().contains_key(key)
    }

    /// Sets a predicate deciding which operations fail.
    ///
    /// A failed operation is still recorded but leaves the data untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use stash_tier::testing::{MockStore, StoreOp};
    ///
    /// let store = MockStore::new();
    ///
    /// // Fail every write
    /// store.fail_when(StoreOp::is_set);
    ///
    /// // Fail reads of one key
    /// store.fail_when(|op| matches!(op, StoreOp::Get(k) if k == "characters"));
    /// ```
    pub fn fail_when<F>(&self, predicate: F)
    where
        F: Fn(&StoreOp) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock() = Some(Box::new(predicate));
    }

    /// Clears the failure predicate.
    pub fn clear_failures(&self) {
        *self.fail_when.lock() = None;
    }

    /// Returns a copy of all recorded operations, oldest first.
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp> {
        self.operations.lock().clone()
    }

    /// Returns the recorded writes, oldest first.
    #[must_use]
    pub fn sets(&self) -> Vec<StoreOp> {
        self.operations.lock().iter().filter(|op| op.is_set()).cloned().collect()
    }

    /// Clears the operation log.
    pub fn clear_operations(&self) {
        self.operations.lock().clear();
    }

    fn admit(&self, op: StoreOp) -> Result<(), Error> {
        let fail = self.fail_when.lock().as_ref().is_some_and(|predicate| predicate(&op));
        let key = op.key().to_owned();
        self.operations.lock().push(op);
        if fail {
            return Err(Error::from_message(format!("mock: operation on '{key}' failed")));
        }
        Ok(())
    }
}

impl ByteStore for MockStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        self.admit(StoreOp::Get(key.to_owned()))?;
        Ok(self.data.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>, options: EntryOptions) -> Result<(), Error> {
        self.admit(StoreOp::Set {
            key: key.to_owned(),
            value: value.clone(),
            options,
        })?;
        self.data.lock().insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        self.admit(StoreOp::Remove(key.to_owned()))?;
        self.data.lock().remove(key);
        Ok(())
    }

    async fn refresh(&self, key: &str) -> Result<(), Error> {
        self.admit(StoreOp::Refresh(key.to_owned()))
    }
}
