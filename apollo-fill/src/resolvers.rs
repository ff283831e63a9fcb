use std::collections::HashMap;

use crate::source::ValueSource;

/// Type names of the built-in scalars, each with a default generator.
const BUILT_IN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Value sources keyed by type name.
///
/// A resolver for an object type supplies values for the fields of every object of that type,
/// below whatever a partial supplies. A resolver for a scalar or enum type generates every leaf
/// of that type. A resolver for an interface or union type is only read for its `__typename`.
///
/// The built-in scalars always have a resolver, which registering another one replaces.
#[derive(Debug, Clone)]
pub struct Resolvers {
    by_type: HashMap<String, ValueSource>,
}

impl Default for Resolvers {
    fn default() -> Self {
        let by_type = BUILT_IN_SCALARS
            .into_iter()
            .filter_map(|type_name| Some((type_name.to_string(), built_in(type_name)?)))
            .collect();
        Self { by_type }
    }
}

fn built_in(type_name: &str) -> Option<ValueSource> {
    Some(match type_name {
        "String" => ValueSource::generator(|_, _, random| random.word()),
        "Int" => ValueSource::generator(|_, _, random| random.int()),
        "Float" => ValueSource::generator(|_, _, random| random.float()),
        "Boolean" => ValueSource::generator(|_, _, random| random.boolean()),
        "ID" => ValueSource::generator(|_, _, random| random.uuid()),
        _ => return None,
    })
}

impl Resolvers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `source` for `type_name`, replacing any previous resolver.
    pub fn with(mut self, type_name: impl Into<String>, source: impl Into<ValueSource>) -> Self {
        self.insert(type_name, source);
        self
    }

    pub fn insert(&mut self, type_name: impl Into<String>, source: impl Into<ValueSource>) {
        self.by_type.insert(type_name.into(), source.into());
    }

    pub fn get(&self, type_name: &str) -> Option<&ValueSource> {
        self.by_type.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.by_type.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}

impl<K: Into<String>, V: Into<ValueSource>> Extend<(K, V)> for Resolvers {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (type_name, source) in iter {
            self.insert(type_name, source);
        }
    }
}

/// Collects resolvers on top of the built-in ones.
impl<K: Into<String>, V: Into<ValueSource>> FromIterator<(K, V)> for Resolvers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut resolvers = Resolvers::default();
        resolvers.extend(iter);
        resolvers
    }
}
