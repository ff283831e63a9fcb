//! Position-derived seeds.
//!
//! Every random value of a fill is drawn from a generator seeded by the [`KeyPath`] of the value,
//! so a value only depends on where it sits in the response, never on what was generated before
//! it.

use std::fmt;

use apollo_compiler::Name;

use crate::random::Random;

/// One step of a [`KeyPath`]: a response key, and the element index when the value is an
/// element of a list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyPathElement {
    pub response_key: Name,
    pub index: Option<usize>,
}

impl fmt::Display for KeyPathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{index}]", self.response_key),
            None => write!(f, "{}", self.response_key),
        }
    }
}

/// The response keys leading from the root of a response to a value.
/// e.g `/user/friends[2]/name`
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyPath(Vec<KeyPathElement>);

impl KeyPath {
    pub fn empty() -> KeyPath {
        KeyPath(Vec::new())
    }

    /// Returns a new path, one step deeper.
    pub fn join(&self, response_key: &Name, index: Option<usize>) -> KeyPath {
        let mut elements = self.0.clone();
        elements.push(KeyPathElement {
            response_key: response_key.clone(),
            index,
        });
        KeyPath(elements)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyPathElement> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&KeyPathElement> {
        self.0.last()
    }

    /// Sums the UTF-16 code units of every formatted element.
    ///
    /// Paths made of the same characters in a different arrangement share a seed. Existing
    /// fixtures depend on these values, so the sum stays as is.
    pub fn seed(&self) -> u64 {
        self.0
            .iter()
            .map(|element| {
                element
                    .to_string()
                    .encode_utf16()
                    .map(u64::from)
                    .sum::<u64>()
            })
            .sum()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in &self.0 {
            write!(f, "/{element}")?;
        }
        Ok(())
    }
}

impl FromIterator<KeyPathElement> for KeyPath {
    fn from_iter<T: IntoIterator<Item = KeyPathElement>>(iter: T) -> Self {
        KeyPath(iter.into_iter().collect())
    }
}

/// Runs `f` with a generator seeded by `path` shifted by `offset`.
///
/// List elements pass their index as offset so that siblings draw different values.
pub(crate) fn with_random<T>(
    path: &KeyPath,
    offset: usize,
    f: impl FnOnce(&mut Random) -> T,
) -> T {
    let seed = path.seed().wrapping_add(offset as u64);
    tracing::trace!(%path, seed, "seeding random values");
    let mut random = Random::seeded(seed);
    f(&mut random)
}
