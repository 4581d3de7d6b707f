// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The authoritative source of character records.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Character, Error, Result};

/// The authoritative store of character records.
///
/// The read-through handler falls back to it on a cache miss and the create commands
/// persist through it. The cache never writes to it.
pub trait CharacterSource: Send + Sync {
    /// Loads every record.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Character>>> + Send;

    /// Loads the records whose location matches `location`, ignoring case.
    fn get_by_location(&self, location: &str) -> impl Future<Output = Result<Vec<Character>>> + Send;

    /// Persists a record, assigning its id, and returns it with any pending events intact.
    fn add(&self, character: Character) -> impl Future<Output = Result<Character>> + Send;

    /// Persists many records, assigning their ids.
    fn add_range(&self, characters: Vec<Character>) -> impl Future<Output = Result<Vec<Character>>> + Send;
}

impl<T> CharacterSource for Arc<T>
where
    T: CharacterSource,
{
    fn get_all(&self) -> impl Future<Output = Result<Vec<Character>>> + Send {
        (**self).get_all()
    }

    fn get_by_location(&self, location: &str) -> impl Future<Output = Result<Vec<Character>>> + Send {
        (**self).get_by_location(location)
    }

    fn add(&self, character: Character) -> impl Future<Output = Result<Character>> + Send {
        (**self).add(character)
    }

    fn add_range(&self, characters: Vec<Character>) -> impl Future<Output = Result<Vec<Character>>> + Send {
        (**self).add_range(characters)
    }
}

#[derive(Debug)]
struct SourceState {
    records: Vec<Character>,
    next_id: u32,
    reads: usize,
    unavailable: bool,
}

/// A [`CharacterSource`] held in process memory.
///
/// Ids are assigned from `1` in insertion order. Clones share the same records, which
/// lets a test keep a handle for inspection. [`reads`](Self::reads) counts the loads
/// served, so tests can tell a cache hit from a fall-through.
///
/// # Examples
///
/// ```
/// use catalog::{Character, CharacterSource, MemorySource};
///
/// # futures::executor::block_on(async {
/// let source = MemorySource::new();
/// let rick = Character::new(0, "Rick Sanchez", "Human", None, "Male", Some("Earth".into())).unwrap();
///
/// let rick = source.add(rick).await.unwrap();
/// assert_eq!(rick.id(), 1);
/// assert_eq!(source.get_by_location("EARTH").await.unwrap().len(), 1);
/// assert_eq!(source.reads(), 1);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    state: Arc<Mutex<SourceState>>,
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SourceState {
                records: Vec::new(),
                next_id: 1,
                reads: 0,
                unavailable: false,
            })),
        }
    }

    /// Returns the number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    /// Returns `true` if no record is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().records.is_empty()
    }

    /// Returns how many loads (`get_all` or `get_by_location`) have been served.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.state.lock().reads
    }

    /// Makes every subsequent operation fail, or succeed again.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unavailable = unavailable;
    }

    fn load<F>(&self, filter: F) -> Result<Vec<Character>>
    where
        F: Fn(&Character) -> bool,
    {
        let mut state = self.state.lock();
        check_available(&state)?;
        state.reads += 1;
        Ok(state.records.iter().filter(|c| filter(c)).cloned().collect())
    }

    fn persist(state: &mut SourceState, mut character: Character) -> Result<Character> {
        if !character.is_persisted() {
            let next_id = state
                .next_id
                .checked_add(1)
                .ok_or_else(|| Error::source_failure("memory source has run out of ids"))?;
            character.assign_id(state.next_id);
            state.next_id = next_id;
        }

        let mut stored = character.clone();
        stored.clear_events();
        state.records.push(stored);
        Ok(character)
    }
}

fn check_available(state: &SourceState) -> Result<()> {
    if state.unavailable {
        return Err(Error::source_failure("memory source is unavailable"));
    }
    Ok(())
}

impl CharacterSource for MemorySource {
    async fn get_all(&self) -> Result<Vec<Character>> {
        self.load(|_| true)
    }

    async fn get_by_location(&self, location: &str) -> Result<Vec<Character>> {
        let location = location.to_lowercase();
        self.load(|c| c.location().is_some_and(|l| l.to_lowercase() == location))
    }

    async fn add(&self, character: Character) -> Result<Character> {
        let mut state = self.state.lock();
        check_available(&state)?;
        Self::persist(&mut state, character)
    }

    async fn add_range(&self, characters: Vec<Character>) -> Result<Vec<Character>> {
        let mut state = self.state.lock();
        check_available(&state)?;

        let unassigned = characters.iter().filter(|c| !c.is_persisted()).count();
        let fits = u32::try_from(unassigned)
            .ok()
            .and_then(|count| state.next_id.checked_add(count))
            .is_some();
        if !fits {
            return Err(Error::source_failure("memory source has run out of ids"));
        }

        characters
            .into_iter()
            .map(|character| Self::persist(&mut state, character))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;
    use crate::ErrorKind;

    fn character(name: &str, location: Option<&str>) -> Character {
        Character::new(0, name, "Human", None, "Female", location.map(str::to_owned)).expect("valid")
    }

    #[test]
    fn ids_are_assigned_in_order() {
        block_on(async {
            let source = MemorySource::new();
            let added = source
                .add_range(vec![character("Beth", None), character("Summer", None)])
                .await
                .expect("add_range failed");
            let jerry = source.add(character("Jerry", None)).await.expect("add failed");

            let ids: Vec<_> = added.iter().map(Character::id).collect();
            assert_eq!(ids, [1, 2]);
            assert_eq!(jerry.id(), 3);
            assert_eq!(source.len(), 3);
        });
    }

    #[test]
    fn stored_copies_carry_no_events() {
        block_on(async {
            let source = MemorySource::new();
            let created = Character::create("Squanchy", "Cat-like", None, "Male", None).expect("valid");

            let mut persisted = source.add(created).await.expect("add failed");
            let mut stored = source.get_all().await.expect("get_all failed");

            assert_eq!(persisted.take_events().len(), 1);
            assert!(stored[0].take_events().is_empty());
        });
    }

    #[test]
    fn location_match_ignores_case() {
        block_on(async {
            let source = MemorySource::new();
            source
                .add_range(vec![
                    character("Beth", Some("Earth")),
                    character("Tammy", Some("Planet Squanch")),
                    character("Birdperson", None),
                ])
                .await
                .expect("add_range failed");

            let found = source.get_by_location("eArTh").await.expect("get_by_location failed");
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].name(), "Beth");
            assert_eq!(source.reads(), 1);
        });
    }

    #[test]
    fn exhausted_ids_are_a_source_error() {
        block_on(async {
            let source = MemorySource::new();
            source.state.lock().next_id = u32::MAX - 1;

            let last = source.add(character("Beth", None)).await.expect("add failed");
            let error = source.add(character("Summer", None)).await.expect_err("should fail");

            assert_eq!(last.id(), u32::MAX - 1);
            assert_eq!(error.kind(), ErrorKind::Source);
            assert_eq!(source.len(), 1);
        });
    }

    #[test]
    fn bulk_add_past_last_id_persists_nothing() {
        block_on(async {
            let source = MemorySource::new();
            source.state.lock().next_id = u32::MAX - 1;

            let error = source
                .add_range(vec![character("Beth", None), character("Summer", None)])
                .await
                .expect_err("should fail");

            assert_eq!(error.kind(), ErrorKind::Source);
            assert!(source.is_empty());
        });
    }

    #[test]
    fn unavailable_source_fails() {
        block_on(async {
            let source = MemorySource::new();
            source.set_unavailable(true);

            let error = source.get_all().await.expect_err("should fail");
            assert_eq!(error.kind(), ErrorKind::Source);
            assert_eq!(source.reads(), 0);
        });
    }
}
