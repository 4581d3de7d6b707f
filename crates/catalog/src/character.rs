// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The character record and its domain events.

use crate::{CharacterResponse, Error, Result};

/// A character record.
///
/// Name, species and gender are required. The id is `0` until the record has been
/// persisted by a [`CharacterSource`](crate::CharacterSource), which assigns it once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    id: u32,
    name: String,
    species: String,
    character_type: Option<String>,
    gender: String,
    location: Option<String>,
    pending: Vec<PendingEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingEvent {
    Created,
}

/// Raised once a character created through [`Character::create`] has been persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterCreated {
    /// The persisted record, as cached.
    pub character: CharacterResponse,
}

/// A domain event raised by a [`Character`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CharacterEvent {
    /// The character was created.
    Created(CharacterCreated),
}

impl Character {
    /// Builds a record without raising any event.
    ///
    /// Bulk imports use this so that they never patch cached collections.
    ///
    /// # Errors
    ///
    /// Returns a [`Validation`](crate::ErrorKind::Validation) error if the name, species
    /// or gender is blank.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        species: impl Into<String>,
        character_type: Option<String>,
        gender: impl Into<String>,
        location: Option<String>,
    ) -> Result<Self> {
        let name = required("name", name.into())?;
        let species = required("species", species.into())?;
        let gender = required("gender", gender.into())?;

        Ok(Self {
            id,
            name,
            species,
            character_type,
            gender,
            location,
            pending: Vec::new(),
        })
    }

    /// Builds a new, unpersisted record that raises [`CharacterCreated`] once persisted.
    ///
    /// # Errors
    ///
    /// Returns a [`Validation`](crate::ErrorKind::Validation) error if the name, species
    /// or gender is blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog::{Character, CharacterEvent};
    ///
    /// let mut character = Character::create("Morty Smith", "Human", None, "Male", Some("Earth".into())).unwrap();
    /// character.assign_id(2);
    ///
    /// let events = character.take_events();
    /// assert!(matches!(&events[..], [CharacterEvent::Created(created)] if created.character.id == 2));
    /// assert!(character.take_events().is_empty());
    /// ```
    pub fn create(
        name: impl Into<String>,
        species: impl Into<String>,
        character_type: Option<String>,
        gender: impl Into<String>,
        location: Option<String>,
    ) -> Result<Self> {
        let mut character = Self::new(0, name, species, character_type, gender, location)?;
        character.pending.push(PendingEvent::Created);
        Ok(character)
    }

    /// Returns the id, `0` while unpersisted.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the species.
    #[must_use]
    pub fn species(&self) -> &str {
        &self.species
    }

    /// Returns the character type, if any.
    #[must_use]
    pub fn character_type(&self) -> Option<&str> {
        self.character_type.as_deref()
    }

    /// Returns the gender.
    #[must_use]
    pub fn gender(&self) -> &str {
        &self.gender
    }

    /// Returns the location, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns `true` once an id has been assigned.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    /// Assigns the id of an unpersisted record. Ids already assigned are kept.
    pub fn assign_id(&mut self, id: u32) {
        if !self.is_persisted() {
            self.id = id;
        }
    }

    pub(crate) fn clear_events(&mut self) {
        self.pending.clear();
    }

    /// Drains the pending domain events, snapshotting the record as it is now.
    pub fn take_events(&mut self) -> Vec<CharacterEvent> {
        let snapshot = CharacterResponse::from(&*self);
        self.pending
            .drain(..)
            .map(|pending| match pending {
                PendingEvent::Created => CharacterEvent::Created(CharacterCreated {
                    character: snapshot.clone(),
                }),
            })
            .collect()
    }
}

fn required(field: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{field} must not be blank")));
    }
    Ok(value)
}
