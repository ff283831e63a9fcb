//! Performance-oriented JSON values, shared with apollo-router responses.

use serde_json_bytes::ByteString;
use serde_json_bytes::Map;

/// A JSON value.
pub type Value = serde_json_bytes::Value;

/// A JSON object.
pub type Object = Map<ByteString, Value>;

pub(crate) trait ValueExt {
    /// Interprets the value as a string the way a `__typename` discriminant is read.
    ///
    /// `None` means "no discriminant" and covers `null`, `false`, zero and the empty string. Any
    /// other string is a type name, anything else is returned as its JSON text so that it can be
    /// reported as an invalid type name.
    fn as_discriminant(&self) -> Option<String>;
}

impl ValueExt for Value {
    fn as_discriminant(&self) -> Option<String> {
        match self {
            Value::Null | Value::Bool(false) => None,
            Value::Number(number) if number.as_f64() == Some(0.0) => None,
            Value::String(name) if name.as_str().is_empty() => None,
            Value::String(name) => Some(name.as_str().to_owned()),
            other => Some(other.to_string()),
        }
    }
}
