use apollo_compiler::Name;
use apollo_compiler::Schema;
use apollo_compiler::ast;
use apollo_compiler::schema::ExtendedType;

use crate::spec::SpecError;

/// The declared output type of a field, with the kind of its named type resolved against the
/// schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Built-in or custom scalar {0}
    Scalar(Name),
    /// Enum type {0}
    Enum(Name),
    /// Object type {0}
    Object(Name),
    /// Interface type {0}
    Interface(Name),
    /// Union type {0}
    Union(Name),
    /// List type {0}
    List(Box<FieldType>),
    /// Non null type {0}
    NonNull(Box<FieldType>),
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Scalar(ty)
            | FieldType::Enum(ty)
            | FieldType::Object(ty)
            | FieldType::Interface(ty)
            | FieldType::Union(ty) => write!(f, "{ty}"),
            FieldType::List(ty) => write!(f, "[{ty}]"),
            FieldType::NonNull(ty) => write!(f, "{ty}!"),
        }
    }
}

impl FieldType {
    // Spec: https://spec.graphql.org/draft/#sec-Type-References
    pub(crate) fn from_ast(ty: &ast::Type, schema: &Schema) -> Result<Self, SpecError> {
        Ok(match ty {
            ast::Type::Named(name) => Self::named(name, schema)?,
            ast::Type::NonNullNamed(name) => Self::NonNull(Box::new(Self::named(name, schema)?)),
            ast::Type::List(inner) => Self::List(Box::new(Self::from_ast(inner, schema)?)),
            ast::Type::NonNullList(inner) => Self::NonNull(Box::new(Self::List(Box::new(
                Self::from_ast(inner, schema)?,
            )))),
        })
    }

    pub(crate) fn named(name: &Name, schema: &Schema) -> Result<Self, SpecError> {
        match schema.types.get(name) {
            Some(ExtendedType::Scalar(_)) => Ok(Self::Scalar(name.clone())),
            Some(ExtendedType::Enum(_)) => Ok(Self::Enum(name.clone())),
            Some(ExtendedType::Object(_)) => Ok(Self::Object(name.clone())),
            Some(ExtendedType::Interface(_)) => Ok(Self::Interface(name.clone())),
            Some(ExtendedType::Union(_)) => Ok(Self::Union(name.clone())),
            // input objects are never the type of a selected field
            Some(ExtendedType::InputObject(_)) | None => {
                Err(SpecError::InvalidType(name.to_string()))
            }
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, FieldType::NonNull(_))
    }

    /// Peels one non null wrapper, if any.
    pub fn unwrap_non_null(&self) -> &FieldType {
        match self {
            FieldType::NonNull(inner) => inner,
            other => other,
        }
    }

    /// Peels every list and non null wrapper.
    pub fn inner_type(&self) -> &FieldType {
        match self {
            FieldType::List(inner) | FieldType::NonNull(inner) => inner.inner_type(),
            other => other,
        }
    }

    /// Interfaces and unions need a concrete type before their fields can be filled.
    pub fn is_abstract(&self) -> bool {
        matches!(self, FieldType::Interface(_) | FieldType::Union(_))
    }

    /// return the name of the type on which selections happen
    ///
    /// Example if we get the field `list: [User!]!`, it will return "User"
    pub fn inner_type_name(&self) -> &Name {
        match self {
            FieldType::Scalar(name)
            | FieldType::Enum(name)
            | FieldType::Object(name)
            | FieldType::Interface(name)
            | FieldType::Union(name) => name,
            FieldType::List(inner) | FieldType::NonNull(inner) => inner.inner_type_name(),
        }
    }
}
