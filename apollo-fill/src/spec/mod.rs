//! Typed operation IR compiled from a schema and an executable document.

mod field_type;
mod operation;
mod schema;
mod selection;

use displaydoc::Display;
pub use field_type::*;
pub use operation::Operation;
pub(crate) use schema::*;
pub use selection::*;
use thiserror::Error;

pub(crate) const TYPENAME: &str = "__typename";

/// GraphQL parsing errors.
#[derive(Error, Debug, Display, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpecError {
    /// selection processing recursion limit exceeded
    RecursionLimitExceeded,
    /// invalid type error, expected another type than '{0}'
    InvalidType(String),
    /// validation error: {0}
    ValidationError(String),
    /// Unknown operation named "{0}"
    UnknownOperation(String),
    /// no query document was given
    MissingQuery,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            SpecError::UnknownOperation("User".to_string()).to_string(),
            r#"Unknown operation named "User""#
        );
        assert_eq!(
            SpecError::InvalidType("Input".to_string()).to_string(),
            "invalid type error, expected another type than 'Input'"
        );
    }
}
