// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Catalog Example
//!
//! Imports a few characters, pages through them, then creates one more and shows that
//! the cached collections are patched instead of reloaded.

use std::time::Duration;

use catalog::{
    CharacterCreateRequest, CharacterQuery, CreateCharacterHandler, CreateCharactersHandler, MemorySource,
    ReadThroughHandler, WriteAsideHandler,
};
use stash::{Stash, StashOptions};
use stash_memory::InMemoryStore;
use tick::Clock;

#[tokio::main(flavor = "current_thread")]
async fn main() -> catalog::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let clock = Clock::new_tokio();
    let store = InMemoryStore::builder(clock.clone()).max_capacity(1_000).build();
    let stash = Stash::builder(store, clock)
        .name("catalog")
        .options(StashOptions::new().with_default_ttl(Some(Duration::from_secs(60))))
        .build();

    let source = MemorySource::new();
    let queries = ReadThroughHandler::new(source.clone(), stash.clone());
    let create = CreateCharacterHandler::new(source.clone(), WriteAsideHandler::new(stash));
    let import = CreateCharactersHandler::new(source.clone());

    // Bulk import does not touch the cache
    import
        .handle(vec![
            CharacterCreateRequest::new("Rick Sanchez", "Human", "Male").with_location("Earth (C-137)"),
            CharacterCreateRequest::new("Morty Smith", "Human", "Male").with_location("Earth (C-137)"),
            CharacterCreateRequest::new("Birdperson", "Bird-Person", "Male").with_location("Bird World"),
        ])
        .await?;

    // First page is a miss and loads every character, the second page is a hit
    let first = queries.handle(&CharacterQuery::default().with_page(1, 2)).await?;
    let second = queries.handle(&CharacterQuery::default().with_page(2, 2)).await?;
    tracing::info!(
        first_from_cache = first.served_from_cache,
        second_from_cache = second.served_from_cache,
        total = first.total_count,
        "paged through all characters"
    );

    // Populate the partition for Earth, then create a new resident
    queries
        .handle(&CharacterQuery::default().with_location("earth (c-137)"))
        .await?;
    let summer = create
        .handle(
            CharacterCreateRequest::new("Summer Smith", "Human", "Female")
                .with_location("Earth (C-137)")
                .with_type("Granddaughter"),
        )
        .await?;

    let earth = queries
        .handle(&CharacterQuery::default().with_location("Earth (C-137)"))
        .await?;
    tracing::info!(
        id = summer.id,
        from_cache = earth.served_from_cache,
        residents = earth.total_count,
        source_reads = source.reads(),
        "new character visible without reloading"
    );

    Ok(())
}
