use serde::Deserialize;
use serde::Serialize;
use serde_json_bytes::ByteString;
use serde_json_bytes::Map as JsonMap;

use crate::json_ext::Object;
use crate::json_ext::Value;

/// The GraphQL request a fill answers.
///
/// Generators receive it as is, so they can shape values after the operation name or the
/// variables of the request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Request {
    /// The GraphQL document. When absent, the document given to [`crate::Filler::fill`] is used.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub query: Option<String>,

    /// Selects the operation of the document, and keys the compiled operation cache.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operation_name: Option<String>,

    /// Variables used to evaluate `@skip` and `@include` conditions.
    #[serde(
        skip_serializing_if = "Object::is_empty",
        default,
        deserialize_with = "deserialize_null_default"
    )]
    pub variables: Object,
}

// `null` variables are the same as no variables
fn deserialize_null_default<'de, D, T: Default + Deserialize<'de>>(
    deserializer: D,
) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
{
    <Option<T>>::deserialize(deserializer).map(|x| x.unwrap_or_default())
}

#[buildstructor::buildstructor]
impl Request {
    #[builder(visibility = "pub")]
    fn new(
        query: Option<String>,
        operation_name: Option<String>,
        // Skip the `Object` type alias in order to use buildstructor’s map special-casing
        variables: JsonMap<ByteString, Value>,
    ) -> Self {
        Self {
            query,
            operation_name,
            variables,
        }
    }

    /// Reads a request from its JSON body.
    pub fn from_bytes(bytes: &[u8]) -> Result<Request, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use serde_json_bytes::json;

    use super::*;

    #[test]
    fn builder_collects_variables() {
        let request = Request::builder()
            .query("{ me { id } }")
            .operation_name("Me")
            .variable("withName", json!(true))
            .build();
        assert_eq!(request.query.as_deref(), Some("{ me { id } }"));
        assert_eq!(request.operation_name.as_deref(), Some("Me"));
        assert_eq!(request.variables.get("withName"), Some(&json!(true)));
    }

    #[test]
    fn from_json_body() {
        let request =
            Request::from_bytes(br#"{"operationName":"Me","variables":null}"#).unwrap();
        assert_eq!(request.query, None);
        assert_eq!(request.operation_name.as_deref(), Some("Me"));
        assert!(request.variables.is_empty());

        let request = Request::from_bytes(br#"{"variables":{"first":2}}"#).unwrap();
        assert_eq!(
            Value::Object(request.variables),
            json!({ "first": 2 })
        );
    }
}
