//! Fill and configuration errors.
use displaydoc::Display;
use thiserror::Error;

pub use crate::spec::SpecError;

/// Errors raised by resolvers and generators, propagated to the caller as is.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error types for a fill.
///
/// Any of them aborts the fill: there is no partial response.
#[derive(Error, Debug, Display)]
#[non_exhaustive]
pub enum FillError {
    /// no type found for '{abstract_type}' (provided type '{provided}' does not exist or is not a possible type)
    UnknownPossibleType {
        /// The interface or union being resolved.
        abstract_type: String,
        /// The discriminant found in the partial or resolver object.
        provided: String,
    },

    /// no type found for '{abstract_type}': it has no possible types
    NoPossibleTypes {
        /// The interface or union being resolved.
        abstract_type: String,
    },

    /// resolver failed at '{path}': {source}
    Resolver {
        /// The key path of the value being resolved.
        path: String,
        /// The error returned by the generator.
        source: BoxError,
    },

    /// {0}
    Spec(#[from] SpecError),
}

/// Error types for configuration.
#[derive(Error, Debug, Display)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// could not parse configuration: {0}
    InvalidYaml(#[from] serde_yaml::Error),

    /// resolver for type '{type_name}' is not valid: {error}
    InvalidResolver {
        /// The type name of the resolver entry.
        type_name: String,
        /// Why the entry could not be converted.
        error: String,
    },
}
