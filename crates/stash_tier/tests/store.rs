// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for the `ByteStore` trait and the mock store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use stash_tier::testing::{MockStore, StoreOp};
use stash_tier::{ByteStore, EntryOptions};

async fn roundtrip<S: ByteStore>(store: &S) -> Option<Vec<u8>> {
    store
        .set("key", b"payload".to_vec(), EntryOptions::new())
        .await
        .expect("error on set");
    store.get("key").await.expect("error on get")
}

#[tokio::test]
async fn mock_get_miss() {
    let store = MockStore::new();
    let result = store.get("missing").await.expect("error on get");
    assert!(result.is_none());
    assert_eq!(store.operations(), vec![StoreOp::Get("missing".to_owned())]);
}

#[tokio::test]
async fn mock_set_then_get() {
    let store = MockStore::new();
    assert_eq!(roundtrip(&store).await, Some(b"payload".to_vec()));
    assert_eq!(store.entry_count(), 1);
}

#[tokio::test]
async fn arc_delegates_to_inner_store() {
    let inner = MockStore::new();
    let store = Arc::new(inner.clone());

    assert_eq!(roundtrip(&store).await, Some(b"payload".to_vec()));
    store.remove("key").await.expect("error on remove");

    assert!(!inner.contains_key("key"));
    assert_eq!(inner.operations().len(), 3);
}

#[tokio::test]
async fn mock_records_options_verbatim() {
    let store = MockStore::new();
    let options = EntryOptions::new().with_sliding_expiration(Duration::from_secs(30));

    store.set("key", vec![1], options).await.expect("error on set");

    match &store.sets()[0] {
        StoreOp::Set { key, value, options: recorded } => {
            assert_eq!(key, "key");
            assert_eq!(value, &vec![1]);
            assert_eq!(*recorded, options);
        }
        other => panic!("unexpected operation: {other:?}"),
    }
}

#[tokio::test]
async fn mock_with_data_serves_seeded_bytes() {
    let store = MockStore::with_data(HashMap::from([("key".to_owned(), vec![9, 9])]));
    assert_eq!(store.get("key").await.expect("error on get"), Some(vec![9, 9]));
}

#[tokio::test]
async fn mock_fail_when_targets_matching_operations() {
    let store = MockStore::new();
    store.fail_when(|op| matches!(op, StoreOp::Get(key) if key == "bad"));

    assert!(store.get("bad").await.is_err());
    assert!(store.get("good").await.is_ok());

    store.clear_failures();
    assert!(store.get("bad").await.is_ok());
}

#[tokio::test]
async fn mock_refresh_and_remove_are_recorded() {
    let store = MockStore::new();
    store.refresh("a").await.expect("error on refresh");
    store.remove("b").await.expect("error on remove");

    assert_eq!(
        store.operations(),
        vec![StoreOp::Refresh("a".to_owned()), StoreOp::Remove("b".to_owned())]
    );

    store.clear_operations();
    assert!(store.operations().is_empty());
}
