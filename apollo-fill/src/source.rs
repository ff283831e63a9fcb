//! Where filled values come from.
//!
//! A [`ValueSource`] is anything a caller can hand in to pin a value: a partial response, a
//! resolver registered for a type, or an element template given to [`list`].

use std::fmt;
use std::sync::Arc;

use apollo_compiler::Name;
use indexmap::IndexMap;
use rand::Rng;

use crate::error::BoxError;
use crate::error::FillError;
use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::random::Random;
use crate::request::Request;
use crate::seed::KeyPath;
use crate::spec::FieldNode;
use crate::spec::FieldType;
use crate::spec::TYPENAME;

type GeneratorFn =
    dyn Fn(&Request, &Details<'_>, &mut Random) -> Result<ValueSource, BoxError> + Send + Sync;

/// A value computed at fill time from the request and the position being filled.
#[derive(Clone)]
pub struct Generator(Arc<GeneratorFn>);

impl Generator {
    pub fn new<F>(generate: F) -> Self
    where
        F: Fn(&Request, &Details<'_>, &mut Random) -> Result<ValueSource, BoxError>
            + Send
            + Sync
            + 'static,
    {
        Generator(Arc::new(generate))
    }

    fn generate(
        &self,
        request: &Request,
        details: &Details<'_>,
        random: &mut Random,
    ) -> Result<ValueSource, BoxError> {
        (self.0)(request, details, random)
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Generator")
    }
}

/// What a generator knows about the value it produces.
#[derive(Debug, Clone, Copy)]
pub struct Details<'a> {
    /// The type of the value, without its non null wrapper.
    pub ty: &'a FieldType,
    /// The object type holding the field.
    pub parent_type: &'a Name,
    pub field: &'a FieldNode,
    /// The key path of the value. Its last element is the field itself, with the element index
    /// when the value is part of a list. Empty for the root object.
    pub path: &'a KeyPath,
}

impl Details<'_> {
    /// The element index of the value in its list, if any.
    pub fn index(&self) -> Option<usize> {
        self.path.last().and_then(|element| element.index)
    }
}

/// A literal value, a partial object or list whose members are sources themselves, or a
/// generator.
#[derive(Debug, Clone)]
pub enum ValueSource {
    Literal(Value),
    Object(IndexMap<String, ValueSource>),
    List(Vec<ValueSource>),
    Generator(Generator),
}

impl ValueSource {
    /// Creates a source computed from the request and the details of the filled value.
    ///
    /// Generators may return generators, which are resolved in turn.
    pub fn generator<F, R>(generate: F) -> Self
    where
        F: Fn(&Request, &Details<'_>, &mut Random) -> R + Send + Sync + 'static,
        R: Into<ValueSource>,
    {
        ValueSource::Generator(Generator::new(move |request, details, random| {
            Ok(generate(request, details, random).into())
        }))
    }

    /// Like [`ValueSource::generator`], for generators that can fail. An error aborts the fill.
    pub fn try_generator<F, R>(generate: F) -> Self
    where
        F: Fn(&Request, &Details<'_>, &mut Random) -> Result<R, BoxError> + Send + Sync + 'static,
        R: Into<ValueSource>,
    {
        ValueSource::Generator(Generator::new(move |request, details, random| {
            generate(request, details, random).map(Into::into)
        }))
    }

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, ValueSource)>) -> Self {
        ValueSource::Object(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    pub fn array(elements: impl IntoIterator<Item = ValueSource>) -> Self {
        ValueSource::List(elements.into_iter().collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ValueSource::Literal(Value::Null))
    }

    /// Looks up a member of an object source. Anything else has no members.
    pub(crate) fn field(&self, key: &str) -> Supplied {
        match self {
            ValueSource::Object(fields) => fields.get(key).cloned().into(),
            ValueSource::Literal(Value::Object(object)) => object
                .get(key)
                .cloned()
                .map(ValueSource::Literal)
                .into(),
            _ => Supplied::Absent,
        }
    }
}

impl From<Value> for ValueSource {
    fn from(value: Value) -> Self {
        ValueSource::Literal(value)
    }
}

impl From<&str> for ValueSource {
    fn from(value: &str) -> Self {
        ValueSource::Literal(Value::String(value.into()))
    }
}

impl From<String> for ValueSource {
    fn from(value: String) -> Self {
        ValueSource::Literal(Value::String(value.into()))
    }
}

impl From<i64> for ValueSource {
    fn from(value: i64) -> Self {
        ValueSource::Literal(Value::Number(value.into()))
    }
}

impl From<i32> for ValueSource {
    fn from(value: i32) -> Self {
        ValueSource::Literal(Value::Number(value.into()))
    }
}

/// Non finite numbers become `null`.
impl From<f64> for ValueSource {
    fn from(value: f64) -> Self {
        ValueSource::Literal(
            serde_json::Number::from_f64(value)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        )
    }
}

impl From<bool> for ValueSource {
    fn from(value: bool) -> Self {
        ValueSource::Literal(Value::Bool(value))
    }
}

impl From<Vec<ValueSource>> for ValueSource {
    fn from(elements: Vec<ValueSource>) -> Self {
        ValueSource::List(elements)
    }
}

impl From<IndexMap<String, ValueSource>> for ValueSource {
    fn from(fields: IndexMap<String, ValueSource>) -> Self {
        ValueSource::Object(fields)
    }
}

impl From<Generator> for ValueSource {
    fn from(generator: Generator) -> Self {
        ValueSource::Generator(generator)
    }
}

/// Whether a source supplied a value at some position, and which.
///
/// `Absent` lets the fill generate the value, `Null` pins it to `null`.
#[derive(Debug, Clone, Default)]
pub(crate) enum Supplied {
    #[default]
    Absent,
    Null,
    Value(ValueSource),
}

impl From<ValueSource> for Supplied {
    fn from(source: ValueSource) -> Self {
        if source.is_null() {
            Supplied::Null
        } else {
            Supplied::Value(source)
        }
    }
}

impl From<Option<ValueSource>> for Supplied {
    fn from(source: Option<ValueSource>) -> Self {
        source.map(Supplied::from).unwrap_or_default()
    }
}

impl Supplied {
    pub(crate) fn is_absent(&self) -> bool {
        matches!(self, Supplied::Absent)
    }

    /// Falls back to `other` only when nothing was supplied: an explicit `null` wins.
    pub(crate) fn or_else(self, other: impl FnOnce() -> Supplied) -> Supplied {
        match self {
            Supplied::Absent => other(),
            supplied => supplied,
        }
    }

    /// Looks up a member. Every member of an explicit `null` is `null`.
    pub(crate) fn field(&self, key: &str) -> Supplied {
        match self {
            Supplied::Value(source) => source.field(key),
            Supplied::Null => Supplied::Null,
            Supplied::Absent => Supplied::Absent,
        }
    }

    /// Looks up the `__typename` discriminant. `null` has none.
    pub(crate) fn discriminant(&self) -> Supplied {
        match self {
            Supplied::Value(source) => source.field(TYPENAME),
            Supplied::Absent | Supplied::Null => Supplied::Absent,
        }
    }

    /// Runs generators until the supplied value is no longer one.
    pub(crate) fn resolve(
        self,
        request: &Request,
        details: &Details<'_>,
        random: &mut Random,
    ) -> Result<Supplied, FillError> {
        let mut supplied = self;
        while let Supplied::Value(ValueSource::Generator(generator)) = &supplied {
            let source =
                generator
                    .generate(request, details, random)
                    .map_err(|source| FillError::Resolver {
                        path: details.path.to_string(),
                        source,
                    })?;
            supplied = source.into();
        }
        Ok(supplied)
    }

    /// The elements of a list source, or the source itself when it is not a list.
    pub(crate) fn into_elements(self) -> Result<Vec<Supplied>, Supplied> {
        match self {
            Supplied::Value(ValueSource::List(elements)) => {
                Ok(elements.into_iter().map(Supplied::from).collect())
            }
            Supplied::Value(ValueSource::Literal(Value::Array(elements))) => Ok(elements
                .into_iter()
                .map(|element| ValueSource::Literal(element).into())
                .collect()),
            other => Err(other),
        }
    }

    /// Converts to JSON as is, running any generator nested in it.
    pub(crate) fn into_value(
        self,
        request: &Request,
        details: &Details<'_>,
        random: &mut Random,
    ) -> Result<Value, FillError> {
        Ok(match self.resolve(request, details, random)? {
            Supplied::Absent | Supplied::Null => Value::Null,
            Supplied::Value(ValueSource::Literal(value)) => value,
            Supplied::Value(ValueSource::Object(fields)) => {
                let mut object = Object::new();
                for (key, value) in fields {
                    object.insert(
                        key,
                        Supplied::from(value).into_value(request, details, random)?,
                    );
                }
                Value::Object(object)
            }
            Supplied::Value(ValueSource::List(elements)) => Value::Array(
                elements
                    .into_iter()
                    .map(|element| Supplied::from(element).into_value(request, details, random))
                    .collect::<Result<_, _>>()?,
            ),
            // resolve never returns a generator
            Supplied::Value(ValueSource::Generator(_)) => Value::Null,
        })
    }
}

/// The length of a list built by [`list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSize {
    Fixed(usize),
    /// Either bound, chosen at random.
    Between(usize, usize),
}

impl From<usize> for ListSize {
    fn from(size: usize) -> Self {
        ListSize::Fixed(size)
    }
}

impl From<(usize, usize)> for ListSize {
    fn from((min, max): (usize, usize)) -> Self {
        ListSize::Between(min, max)
    }
}

impl From<[usize; 2]> for ListSize {
    fn from([min, max]: [usize; 2]) -> Self {
        ListSize::Between(min, max)
    }
}

/// Builds a partial list repeating `partial`.
///
/// The length of a [`ListSize::Between`] is picked with the thread random generator, so it
/// changes from one call to the next.
pub fn list(size: impl Into<ListSize>, partial: impl Into<ValueSource>) -> ValueSource {
    let size = match size.into() {
        ListSize::Fixed(size) => size,
        ListSize::Between(min, max) => {
            if rand::rng().random_bool(0.5) {
                max
            } else {
                min
            }
        }
    };
    ValueSource::List(vec![partial.into(); size])
}
