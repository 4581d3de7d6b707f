// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Commands that create characters.

use stash_tier::ByteStore;

use crate::{Character, CharacterCreateRequest, CharacterEvent, CharacterResponse, CharacterSource, Result, WriteAsideHandler};

/// Creates one character and patches the cached collections that should hold it.
#[derive(Debug)]
pub struct CreateCharacterHandler<S, B> {
    source: S,
    write_aside: WriteAsideHandler<B>,
}

impl<S, B> CreateCharacterHandler<S, B>
where
    S: CharacterSource,
    B: ByteStore,
{
    /// Creates a handler persisting to `source` and dispatching to `write_aside`.
    #[must_use]
    pub fn new(source: S, write_aside: WriteAsideHandler<B>) -> Self {
        Self { source, write_aside }
    }

    /// Validates, persists and announces a new character.
    ///
    /// The character is persisted before any cache is touched. Its created event is then
    /// dispatched to the [`WriteAsideHandler`].
    ///
    /// # Errors
    ///
    /// Returns a [`Validation`](crate::ErrorKind::Validation) error for invalid input, a
    /// [`Source`](crate::ErrorKind::Source) error if persisting fails, and a
    /// [`Cache`](crate::ErrorKind::Cache) error if patching the cache fails. A cache
    /// failure is reported after the character has been persisted.
    pub async fn handle(&self, request: CharacterCreateRequest) -> Result<CharacterResponse> {
        request.validate()?;
        let character = Character::create(
            request.name,
            request.species,
            request.character_type,
            request.gender,
            request.location,
        )?;

        let mut character = self.source.add(character).await?;
        tracing::info!(id = character.id(), "character created");

        for event in character.take_events() {
            match event {
                CharacterEvent::Created(created) => {
                    self.write_aside.handle(&created).await?;
                }
            }
        }

        Ok(CharacterResponse::from(&character))
    }
}

/// Creates many characters at once without touching the cache.
///
/// Bulk imports raise no created events; cached collections pick the new records up
/// when they are next loaded from the source.
#[derive(Debug)]
pub struct CreateCharactersHandler<S> {
    source: S,
}

impl<S: CharacterSource> CreateCharactersHandler<S> {
    /// Creates a handler persisting to `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Validates and persists every request, or none if any is invalid.
    ///
    /// # Errors
    ///
    /// Returns a [`Validation`](crate::ErrorKind::Validation) error for the first invalid
    /// request and a [`Source`](crate::ErrorKind::Source) error if persisting fails.
    pub async fn handle(&self, requests: Vec<CharacterCreateRequest>) -> Result<Vec<CharacterResponse>> {
        let characters = requests
            .into_iter()
            .map(|request| {
                request.validate()?;
                Character::new(
                    0,
                    request.name,
                    request.species,
                    request.character_type,
                    request.gender,
                    request.location,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let persisted = self.source.add_range(characters).await?;
        tracing::info!(count = persisted.len(), "characters imported");

        Ok(persisted.iter().map(CharacterResponse::from).collect())
    }
}
