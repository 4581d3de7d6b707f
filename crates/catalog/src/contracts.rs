// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Request and response shapes.

use serde::{Deserialize, Serialize};

use crate::{Character, Error, Result};

const MAX_NAME_LEN: usize = 200;
const MAX_SPECIES_LEN: usize = 100;
const MAX_TYPE_LEN: usize = 100;
const MAX_GENDER_LEN: usize = 10;
const MAX_LOCATION_LEN: usize = 100;

/// The flat projection of a [`Character`] that is cached and returned by queries.
///
/// Serialized with camelCase field names; the character type is serialized as `type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterResponse {
    /// Identifier assigned by the source.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Species, such as `Human`.
    pub species: String,
    /// Optional sub-type, such as `Parasite`.
    #[serde(rename = "type")]
    pub character_type: Option<String>,
    /// Gender.
    pub gender: String,
    /// Last known location, if any.
    pub location: Option<String>,
}

impl From<&Character> for CharacterResponse {
    fn from(character: &Character) -> Self {
        Self {
            id: character.id(),
            name: character.name().to_owned(),
            species: character.species().to_owned(),
            character_type: character.character_type().map(str::to_owned),
            gender: character.gender().to_owned(),
            location: character.location().map(str::to_owned),
        }
    }
}

/// Input for creating a character.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterCreateRequest {
    /// Display name; required, at most 200 characters.
    pub name: String,
    /// Species; required, at most 100 characters.
    pub species: String,
    /// Optional sub-type, at most 100 characters.
    #[serde(rename = "type", default)]
    pub character_type: Option<String>,
    /// Gender; required, at most 10 characters.
    pub gender: String,
    /// Optional location, at most 100 characters.
    #[serde(default)]
    pub location: Option<String>,
}

impl CharacterCreateRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, species: impl Into<String>, gender: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            species: species.into(),
            character_type: None,
            gender: gender.into(),
            location: None,
        }
    }

    /// Sets the character type.
    #[must_use]
    pub fn with_type(mut self, character_type: impl Into<String>) -> Self {
        self.character_type = Some(character_type.into());
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Checks field lengths.
    ///
    /// Blank required fields are rejected when the [`Character`] is built.
    ///
    /// # Errors
    ///
    /// Returns a [`Validation`](crate::ErrorKind::Validation) error naming the first
    /// field that is too long.
    pub fn validate(&self) -> Result<()> {
        check_len("name", &self.name, MAX_NAME_LEN)?;
        check_len("species", &self.species, MAX_SPECIES_LEN)?;
        check_len("gender", &self.gender, MAX_GENDER_LEN)?;
        if let Some(character_type) = &self.character_type {
            check_len("type", character_type, MAX_TYPE_LEN)?;
        }
        if let Some(location) = &self.location {
            check_len("location", location, MAX_LOCATION_LEN)?;
        }
        Ok(())
    }
}

fn check_len(field: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(Error::validation(format!("{field} must be at most {max} characters, got {len}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_serializes_type_field_name() {
        let response = CharacterResponse {
            id: 1,
            name: "Rick Sanchez".to_owned(),
            species: "Human".to_owned(),
            character_type: None,
            gender: "Male".to_owned(),
            location: Some("Earth (C-137)".to_owned()),
        };

        let json = serde_json::to_string(&response).expect("serialize");
        assert_eq!(
            json,
            r#"{"id":1,"name":"Rick Sanchez","species":"Human","type":null,"gender":"Male","location":"Earth (C-137)"}"#
        );
    }

    #[test]
    fn request_deserializes_with_optional_fields_missing() {
        let request: CharacterCreateRequest =
            serde_json::from_str(r#"{"name":"Summer","species":"Human","gender":"Female"}"#).expect("deserialize");
        assert_eq!(request, CharacterCreateRequest::new("Summer", "Human", "Female"));
    }

    #[test]
    fn validate_rejects_long_gender() {
        let request = CharacterCreateRequest::new("Rick", "Human", "x".repeat(11));
        let error = request.validate().expect_err("should be rejected");
        assert_eq!(error.kind(), crate::ErrorKind::Validation);
    }

    #[test]
    fn validate_accepts_limits() {
        let request = CharacterCreateRequest::new("n".repeat(200), "s".repeat(100), "g".repeat(10))
            .with_type("t".repeat(100))
            .with_location("l".repeat(100));
        request.validate().expect("limits are inclusive");
    }
}
