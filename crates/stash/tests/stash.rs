// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for the `Stash` facade.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stash::{ErrorKind, Flag, Stash, StashOptions};
use stash_memory::InMemoryStore;
use stash_tier::EntryOptions;
use stash_tier::testing::{MockStore, StoreOp};
use tick::{Clock, ClockControl};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Episode {
    code: String,
    title: String,
}

fn pilot() -> Episode {
    Episode {
        code: "S01E01".to_owned(),
        title: "Pilot".to_owned(),
    }
}

fn mock_stash() -> (Stash<MockStore>, MockStore) {
    let store = MockStore::new();
    let stash = Stash::builder(store.clone(), Clock::new_frozen()).logs(false).build();
    (stash, store)
}

#[tokio::test]
async fn set_then_get_returns_equal_value() {
    let (stash, _store) = mock_stash();

    stash.set("episode", &pilot(), None).await.expect("error on set");
    let value: Option<Episode> = stash.get("episode").await.expect("error on get");

    assert_eq!(value, Some(pilot()));
}

#[tokio::test]
async fn every_get_builds_a_fresh_value() {
    let (stash, _store) = mock_stash();
    stash.set("episode", &pilot(), None).await.expect("error on set");

    let mut first: Episode = stash.get("episode").await.expect("error on get").expect("hit");
    first.title.push_str(" (edited)");
    let second: Episode = stash.get("episode").await.expect("error on get").expect("hit");

    assert_eq!(second, pilot());
}

#[tokio::test]
async fn missing_key_is_none() {
    let (stash, _store) = mock_stash();
    assert_eq!(stash.get::<Episode>("missing").await.expect("error on get"), None);
}

#[tokio::test]
async fn empty_bytes_are_a_miss() {
    let (stash, store) = mock_stash();
    store.seed("empty", Vec::new());
    assert_eq!(stash.get::<Episode>("empty").await.expect("error on get"), None);
}

#[tokio::test]
async fn strings_are_stored_as_text() {
    let (stash, store) = mock_stash();

    stash.set("owned", &"Get Schwifty".to_owned(), None).await.expect("error on set");
    stash.set_str("borrowed", "Get Schwifty", None).await.expect("error on set");

    for key in ["owned", "borrowed"] {
        let bytes = store.peek(key).expect("value stored");
        assert_eq!(Flag::from(bytes[0]), Flag::PlainText);
        assert_eq!(stash.get::<String>(key).await.expect("error on get").as_deref(), Some("Get Schwifty"));
    }
}

#[tokio::test]
async fn compression_threshold_comes_from_options() {
    let store = MockStore::new();
    let stash = Stash::new(store.clone(), StashOptions::new().with_compression_threshold(8), Clock::new_frozen());

    stash.set_str("short", "1234567", None).await.expect("error on set");
    stash.set_str("long", "12345678", None).await.expect("error on set");

    assert_eq!(Flag::from(store.peek("short").expect("stored")[0]), Flag::PlainText);
    assert_eq!(Flag::from(store.peek("long").expect("stored")[0]), Flag::PlainTextCompressed);
    assert_eq!(stash.get::<String>("long").await.expect("error on get").as_deref(), Some("12345678"));
}

#[tokio::test]
async fn default_expiration_applies_when_none_given() {
    let (stash, store) = mock_stash();

    stash.set("episode", &pilot(), None).await.expect("error on set");

    match &store.sets()[0] {
        StoreOp::Set { options, .. } => {
            assert_eq!(options.absolute_expiration_relative_to_now(), Some(Duration::from_secs(300)));
        }
        other => panic!("unexpected operation: {other:?}"),
    }
}

#[tokio::test]
async fn store_failure_on_get_is_store_error() {
    let (stash, store) = mock_stash();
    store.fail_when(|op| matches!(op, StoreOp::Get(_)));

    let error = stash.get::<Episode>("episode").await.expect_err("get should fail");
    assert_eq!(error.kind(), ErrorKind::Store);
}

#[tokio::test]
async fn undecodable_bytes_are_deserialization_error() {
    let (stash, store) = mock_stash();
    store.seed("episode", b"\x03{not json".to_vec());

    let error = stash.get::<Episode>("episode").await.expect_err("get should fail");
    assert_eq!(error.kind(), ErrorKind::Deserialization);
}

#[tokio::test]
async fn remove_and_refresh_pass_through() {
    let (stash, store) = mock_stash();
    stash.set("episode", &pilot(), None).await.expect("error on set");

    stash.refresh("episode").await.expect("error on refresh");
    stash.remove("episode").await.expect("error on remove");

    assert!(!store.contains_key("episode"));
    assert!(store.operations().contains(&StoreOp::Refresh("episode".to_owned())));
    assert!(store.operations().contains(&StoreOp::Remove("episode".to_owned())));
}

#[tokio::test]
async fn in_memory_store_expires_default_ttl() {
    let control = ClockControl::new();
    let clock = control.to_clock();
    let stash = Stash::new(InMemoryStore::new(clock.clone()), StashOptions::default(), clock);

    stash.set("episode", &pilot(), None).await.expect("error on set");

    control.advance(Duration::from_secs(299));
    assert!(stash.get::<Episode>("episode").await.expect("error on get").is_some());

    control.advance(Duration::from_secs(1));
    assert!(stash.get::<Episode>("episode").await.expect("error on get").is_none());
}

#[tokio::test]
async fn in_memory_store_honors_explicit_sliding_expiration() {
    let control = ClockControl::new();
    let clock = control.to_clock();
    let stash = Stash::new(InMemoryStore::new(clock.clone()), StashOptions::default(), clock);
    let options = EntryOptions::new().with_sliding_expiration(Duration::from_secs(60));

    stash.set("episode", &pilot(), Some(options)).await.expect("error on set");

    // Outlives the five minute default because reads keep renewing the window.
    for _ in 0..10 {
        control.advance(Duration::from_secs(45));
        assert!(stash.get::<Episode>("episode").await.expect("error on get").is_some());
    }

    control.advance(Duration::from_secs(60));
    assert!(stash.get::<Episode>("episode").await.expect("error on get").is_none());
}

#[test]
fn builder_defaults() {
    let stash = Stash::builder(MockStore::new(), Clock::new_frozen()).build();
    assert_eq!(stash.name(), "stash");
    assert_eq!(stash.codec().compression_threshold(), 2048);
    assert_eq!(
        stash.adapter().default_options(),
        EntryOptions::new().with_ttl(Duration::from_secs(300))
    );
}

#[tokio::test]
async fn static_str_value_is_stored_as_text() {
    let (stash, store) = mock_stash();

    stash.set("catchphrase", &"Wubba lubba dub dub", None).await.expect("error on set");

    let raw = store.peek("catchphrase").expect("stored");
    assert_eq!(Flag::from(raw[0]), Flag::PlainText);
    assert_eq!(&raw[1..], b"Wubba lubba dub dub");
    let value: Option<String> = stash.get("catchphrase").await.expect("error on get");
    assert_eq!(value.as_deref(), Some("Wubba lubba dub dub"));
}
