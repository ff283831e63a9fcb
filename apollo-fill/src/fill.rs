//! The recursive fill of an operation's field tree.

use std::collections::HashMap;
use std::sync::Arc;

use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::validation::Valid;
use parking_lot::Mutex;
use serde_json_bytes::ByteString;

use crate::configuration::Configuration;
use crate::error::ConfigurationError;
use crate::error::FillError;
use crate::json_ext::Object;
use crate::json_ext::Value;
use crate::json_ext::ValueExt;
use crate::random::Random;
use crate::request::Request;
use crate::resolvers::Resolvers;
use crate::seed::KeyPath;
use crate::seed::with_random;
use crate::source::Details;
use crate::source::Supplied;
use crate::source::ValueSource;
use crate::spec::FieldNode;
use crate::spec::FieldType;
use crate::spec::Operation;
use crate::spec::SpecError;
use crate::spec::enum_values;
use crate::spec::possible_types;

/// Produces response data for operations against one schema.
///
/// Compiled operations are cached by operation name for the lifetime of the filler: a request
/// naming an operation that was already compiled reuses it, whatever its document.
#[derive(Debug)]
pub struct Filler {
    schema: Arc<Valid<Schema>>,
    resolvers: Arc<Resolvers>,
    operations: Mutex<HashMap<String, Arc<Operation>>>,
}

#[buildstructor::buildstructor]
impl Filler {
    /// `resolvers` defaults to the built-in scalar resolvers.
    #[builder(visibility = "pub")]
    fn new(schema: Valid<Schema>, resolvers: Option<Resolvers>) -> Self {
        Self {
            schema: Arc::new(schema),
            resolvers: Arc::new(resolvers.unwrap_or_default()),
            operations: Default::default(),
        }
    }

    /// Creates a filler using the resolvers of a configuration.
    pub fn from_configuration(
        schema: Valid<Schema>,
        configuration: &Configuration,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self::new(schema, Some(configuration.resolvers()?)))
    }

    pub fn schema(&self) -> &Valid<Schema> {
        &self.schema
    }

    pub fn resolvers(&self) -> &Resolvers {
        &self.resolvers
    }

    /// Prepares a fill of `document` where `partial` pins some of the values.
    ///
    /// Nothing is compiled until [`Fill::respond`].
    pub fn fill(&self, document: impl Into<String>, partial: Option<ValueSource>) -> Fill<'_> {
        Fill {
            filler: self,
            document: document.into(),
            partial,
        }
    }

    fn operation(&self, request: &Request, document: &str) -> Result<Arc<Operation>, SpecError> {
        if let Some(operation_name) = &request.operation_name {
            if let Some(operation) = self.operations.lock().get(operation_name) {
                tracing::trace!(%operation_name, "operation cache hit");
                return Ok(operation.clone());
            }
        }

        let query = request
            .query
            .as_deref()
            .filter(|query| !query.trim().is_empty())
            .unwrap_or(document);
        if query.trim().is_empty() {
            return Err(SpecError::MissingQuery);
        }
        let operation = Arc::new(Operation::compile(
            &self.schema,
            query,
            request.operation_name.as_deref(),
        )?);
        tracing::debug!(
            operation_name = ?request.operation_name,
            root_type = %operation.root_type,
            "compiled operation"
        );

        if let Some(operation_name) = &request.operation_name {
            self.operations
                .lock()
                .insert(operation_name.clone(), operation.clone());
        }
        Ok(operation)
    }
}

/// A document and partial data, waiting for the request to answer.
#[derive(Debug)]
pub struct Fill<'a> {
    filler: &'a Filler,
    document: String,
    partial: Option<ValueSource>,
}

impl Fill<'_> {
    /// Fills the data of a response to `request`.
    ///
    /// The same request always yields the same data, as long as the generators involved only
    /// draw from the random source they are given.
    pub fn respond(&self, request: &Request) -> Result<Value, FillError> {
        let operation = self.filler.operation(request, &self.document)?;

        let mut variables = operation.variable_defaults.clone();
        for (name, value) in request.variables.iter() {
            variables.insert(name.clone(), value.clone());
        }

        let context = Context {
            schema: &self.filler.schema,
            resolvers: &self.filler.resolvers,
            request,
            variables,
        };
        context.fill_root(&operation, self.partial.clone().into())
    }
}

struct Context<'a> {
    schema: &'a Valid<Schema>,
    resolvers: &'a Resolvers,
    request: &'a Request,
    /// Request variables over the operation's default values.
    variables: Object,
}

impl Context<'_> {
    #[tracing::instrument(skip_all, level = "trace", fields(root_type = %operation.root_type))]
    fn fill_root(&self, operation: &Operation, partial: Supplied) -> Result<Value, FillError> {
        self.fill_object(
            &operation.root_type,
            &operation.root_type,
            &operation.root,
            &KeyPath::empty(),
            partial,
        )
    }

    /// Fills the selections of `node` for an object of type `object_type`.
    ///
    /// Each field takes the partial's value when the partial has the key, else the value of the
    /// resolver registered for `object_type`.
    fn fill_object(
        &self,
        object_type: &Name,
        parent_type: &Name,
        node: &FieldNode,
        path: &KeyPath,
        partial: Supplied,
    ) -> Result<Value, FillError> {
        let ty = FieldType::Object(object_type.clone());
        let details = Details {
            ty: &ty,
            parent_type,
            field: node,
            path,
        };
        let (resolver_object, partial_object) =
            with_random(path, offset(path), |random| -> Result<_, FillError> {
                Ok((
                    self.resolver(object_type).resolve(self.request, &details, random)?,
                    partial.resolve(self.request, &details, random)?,
                ))
            })?;

        // an explicit `null` against nothing else is a `null` object, otherwise its members
        // are all `null`
        if matches!(
            (&resolver_object, &partial_object),
            (Supplied::Null, Supplied::Absent | Supplied::Null) | (Supplied::Absent, Supplied::Null)
        ) {
            return Ok(Value::Null);
        }

        let mut object = Object::new();
        for field in &node.selections {
            if field.should_skip(&self.variables) {
                continue;
            }
            let value = if field.is_typename() {
                Value::String(object_type.as_str().into())
            } else {
                let supplied = partial_object
                    .field(&field.response_key)
                    .or_else(|| resolver_object.field(&field.response_key));
                self.fill_type(object_type, field, &field.ty, path, None, supplied)?
            };
            object.insert(ByteString::from(field.response_key.as_str()), value);
        }
        Ok(Value::Object(object))
    }

    /// Fills one value of `field`, of type `ty`: the field's own type, or the element type when
    /// `index` is set.
    fn fill_type(
        &self,
        parent_type: &Name,
        field: &FieldNode,
        ty: &FieldType,
        parent_path: &KeyPath,
        index: Option<usize>,
        partial: Supplied,
    ) -> Result<Value, FillError> {
        let path = parent_path.join(&field.response_key, index);
        let nullable = !ty.is_non_null();
        let details = Details {
            ty: ty.unwrap_non_null(),
            parent_type,
            field,
            path: &path,
        };

        match details.ty {
            FieldType::Scalar(_) | FieldType::Enum(_) => {
                with_random(&path, offset(&path), |random| {
                    let supplied = match partial {
                        Supplied::Absent if nullable && random.choose_null() => {
                            return Ok(Value::Null);
                        }
                        Supplied::Absent => self.leaf(details.ty, random),
                        supplied => supplied,
                    };
                    supplied.into_value(self.request, &details, random)
                })
            }
            FieldType::List(element_type) => {
                let container = with_random(&path, offset(&path), |random| {
                    let supplied = match partial {
                        Supplied::Absent if nullable && random.choose_null() => Supplied::Null,
                        Supplied::Absent => ValueSource::List(Vec::new()).into(),
                        supplied => supplied,
                    };
                    supplied.resolve(self.request, &details, random)
                })?;
                match container.into_elements() {
                    Ok(elements) => elements
                        .into_iter()
                        .enumerate()
                        .map(|(index, element)| {
                            self.fill_type(
                                parent_type,
                                field,
                                element_type,
                                parent_path,
                                Some(index),
                                element,
                            )
                        })
                        .collect::<Result<_, _>>()
                        .map(Value::Array),
                    Err(other) => with_random(&path, offset(&path), |random| {
                        other.into_value(self.request, &details, random)
                    }),
                }
            }
            FieldType::Interface(abstract_type) | FieldType::Union(abstract_type) => {
                let selected = with_random(&path, offset(&path), |random| {
                    self.select_possible_type(abstract_type, &details, partial, nullable, random)
                })?;
                match selected {
                    Some((concrete_type, partial)) => self.fill_object(
                        &concrete_type,
                        parent_type,
                        field.select(&concrete_type),
                        &path,
                        partial,
                    ),
                    None => Ok(Value::Null),
                }
            }
            FieldType::Object(object_type) => {
                let partial = with_random(&path, offset(&path), |random| match partial {
                    Supplied::Absent if nullable && random.choose_null() => None,
                    supplied => Some(supplied),
                });
                match partial {
                    Some(partial) => {
                        self.fill_object(object_type, parent_type, field, &path, partial)
                    }
                    None => Ok(Value::Null),
                }
            }
            // `T!!` does not parse
            FieldType::NonNull(_) => {
                self.fill_type(parent_type, field, details.ty, parent_path, index, partial)
            }
        }
    }

    /// Picks the concrete type of an abstract value, from the `__typename` of the partial, else
    /// of the resolver, else at random.
    ///
    /// Returns the concrete type with the resolved partial, or `None` when a nullable value
    /// without partial comes out as `null`.
    fn select_possible_type(
        &self,
        abstract_type: &Name,
        details: &Details<'_>,
        partial: Supplied,
        nullable: bool,
        random: &mut Random,
    ) -> Result<Option<(Name, Supplied)>, FillError> {
        let resolver_object = self
            .resolver(abstract_type)
            .resolve(self.request, details, random)?;
        let partial = partial.resolve(self.request, details, random)?;
        let discriminant = partial
            .discriminant()
            .or_else(|| resolver_object.discriminant())
            .into_value(self.request, details, random)?
            .as_discriminant();

        let possible = possible_types(self.schema, abstract_type);
        let concrete_type = match discriminant {
            Some(provided) => possible
                .into_iter()
                .find(|possible_type| possible_type.as_str() == provided)
                .ok_or_else(|| FillError::UnknownPossibleType {
                    abstract_type: abstract_type.to_string(),
                    provided,
                })?,
            None => random
                .pick(&possible)
                .copied()
                .ok_or_else(|| FillError::NoPossibleTypes {
                    abstract_type: abstract_type.to_string(),
                })?,
        };

        if partial.is_absent() && nullable && random.choose_null() {
            return Ok(None);
        }
        Ok(Some((concrete_type.clone(), partial)))
    }

    fn resolver(&self, type_name: &str) -> Supplied {
        self.resolvers.get(type_name).cloned().into()
    }

    /// The source of a scalar or enum leaf that no partial supplies.
    fn leaf(&self, ty: &FieldType, random: &mut Random) -> Supplied {
        let type_name = ty.inner_type_name();
        if let Some(resolver) = self.resolvers.get(type_name) {
            return resolver.clone().into();
        }
        match ty {
            FieldType::Enum(_) => {
                let values = enum_values(self.schema, type_name);
                random
                    .pick(&values)
                    .map(|value| ValueSource::from(value.as_str()))
                    .into()
            }
            _ => ValueSource::from(random.word()).into(),
        }
    }
}

/// List elements shift their seed by their index.
fn offset(path: &KeyPath) -> usize {
    path.last().and_then(|element| element.index).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json_bytes::json;

    use super::*;

    const SCHEMA: &str = r#"
        type Query {
            user: User
            users: [User!]!
            pet: Pet!
            role: Role!
        }
        type User { id: ID! name: String! age: Int! }
        type Dog { name: String! barks: Boolean! }
        type Cat { name: String! lives: Int! }
        union Pet = Dog | Cat
        enum Role { ADMIN EDITOR VIEWER }
    "#;

    fn get<'v>(value: &'v Value, key: &str) -> &'v Value {
        value.as_object().and_then(|object| object.get(key)).unwrap()
    }

    fn filler() -> Filler {
        Filler::builder()
            .schema(Schema::parse_and_validate(SCHEMA, "schema.graphql").unwrap())
            .build()
    }

    #[test]
    fn typename_is_the_concrete_type() {
        let filler = filler();
        let data = filler
            .fill("{ __typename pet { __typename } }", None)
            .respond(&Request::default())
            .unwrap();
        assert_eq!(get(&data, "__typename"), &json!("Query"));
        let pet = get(get(&data, "pet"), "__typename").as_str().unwrap();
        assert!(pet == "Dog" || pet == "Cat");
    }

    #[test]
    fn enum_values_come_from_the_schema() {
        let filler = filler();
        let data = filler
            .fill("{ role }", None)
            .respond(&Request::default())
            .unwrap();
        let role = get(&data, "role").as_str().unwrap();
        assert!(["ADMIN", "EDITOR", "VIEWER"].contains(&role));
    }

    #[test]
    fn lists_are_empty_by_default() {
        let filler = filler();
        let data = filler
            .fill("{ users { id } }", None)
            .respond(&Request::default())
            .unwrap();
        assert_eq!(data, json!({ "users": [] }));
    }

    #[test]
    fn list_elements_differ() {
        let filler = filler();
        let data = filler
            .fill(
                "{ users { id } }",
                Some(json!({ "users": [{}, {}, {}] }).into()),
            )
            .respond(&Request::default())
            .unwrap();
        let ids: Vec<_> = get(&data, "users")
            .as_array()
            .unwrap()
            .iter()
            .map(|user| get(user, "id").clone())
            .collect();
        assert_eq!(ids.len(), 3);
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
    }

    #[test]
    fn operations_are_cached_by_name() {
        let filler = filler();
        let request = Request::builder()
            .query("query Roles { role }")
            .operation_name("Roles")
            .build();
        filler.fill("", None).respond(&request).unwrap();

        // the cached operation wins over the new document
        let request = Request::builder()
            .query("query Roles { __typename }")
            .operation_name("Roles")
            .build();
        let data = filler.fill("", None).respond(&request).unwrap();
        let keys: Vec<_> = data.as_object().unwrap().keys().map(|key| key.as_str()).collect();
        assert_eq!(keys, ["role"]);
    }

    #[test]
    fn document_is_used_without_query() {
        let filler = filler();
        let data = filler
            .fill("{ __typename }", None)
            .respond(&Request::default())
            .unwrap();
        assert_eq!(data, json!({ "__typename": "Query" }));

        let error = filler
            .fill(" ", None)
            .respond(&Request::default())
            .unwrap_err();
        assert!(matches!(error, FillError::Spec(SpecError::MissingQuery)));
    }

    #[test]
    fn offsets_come_from_the_last_index() {
        let path = KeyPath::empty()
            .join(&apollo_compiler::name!("users"), Some(4))
            .join(&apollo_compiler::name!("id"), None);
        assert_eq!(offset(&path), 0);
        let path = path.join(&apollo_compiler::name!("tags"), Some(2));
        assert_eq!(offset(&path), 2);
    }
}
