//! Filler configuration, read from YAML.

use std::collections::HashMap;
use std::str::FromStr;

use schemars::JsonSchema;
use schemars::r#gen::SchemaSettings;
use schemars::schema::RootSchema;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigurationError;
use crate::resolvers::Resolvers;
use crate::source::ValueSource;

/// The configuration of a [`crate::Filler`].
///
/// ```yaml
/// resolvers:
///   DateTime: "2020-01-01T00:00:00Z"
///   User:
///     name: Ada
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, default)]
pub struct Configuration {
    /// Literal values keyed by type name, used as that type's resolver.
    ///
    /// Objects give the values of fields of an object type, any other value is used as is for
    /// every leaf of a scalar or enum type. Entries replace the built-in scalar resolvers.
    pub resolvers: HashMap<String, serde_json::Value>,
}

impl Configuration {
    /// The built-in resolvers with the configured ones on top.
    pub fn resolvers(&self) -> Result<Resolvers, ConfigurationError> {
        self.resolvers
            .iter()
            .map(|(type_name, value)| {
                let value = serde_json_bytes::to_value(value).map_err(|error| {
                    ConfigurationError::InvalidResolver {
                        type_name: type_name.clone(),
                        error: error.to_string(),
                    }
                })?;
                Ok((type_name.clone(), ValueSource::from(value)))
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()
            .map(|entries| entries.into_iter().collect())
    }

    /// A JSON schema of the configuration file, for editor support.
    pub fn json_schema() -> RootSchema {
        let settings = SchemaSettings::draft07().with(|s| {
            s.option_nullable = true;
            s.option_add_null_type = false;
        });
        settings.into_generator().into_root_schema_for::<Configuration>()
    }
}

impl FromStr for Configuration {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_yaml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_json_snapshot;
    use serde_json_bytes::json;

    use super::*;
    use crate::json_ext::Value;

    #[test]
    fn empty_configuration() {
        let configuration = Configuration::from_str("{}").unwrap();
        assert!(configuration.resolvers.is_empty());
        assert_eq!(configuration.resolvers().unwrap().len(), 5);
    }

    #[test]
    fn literal_resolvers() {
        let configuration = Configuration::from_str(
            r#"
resolvers:
  String: fixed
  User:
    name: Ada
    age: 36
"#,
        )
        .unwrap();
        let resolvers = configuration.resolvers().unwrap();
        let Some(ValueSource::Literal(user)) = resolvers.get("User") else {
            panic!("User resolver should be a literal");
        };
        assert_eq!(user, &json!({ "name": "Ada", "age": 36 }));
        let Some(ValueSource::Literal(string)) = resolvers.get("String") else {
            panic!("String resolver should be a literal");
        };
        assert_eq!(string, &Value::String("fixed".into()));
        assert!(resolvers.contains("ID"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = Configuration::from_str("resolver: {}").unwrap_err();
        assert!(matches!(error, ConfigurationError::InvalidYaml(_)));
        assert!(error.to_string().starts_with("could not parse configuration"));
    }

    #[test]
    fn schema() {
        let schema = serde_json::to_value(Configuration::json_schema()).unwrap();
        assert_json_snapshot!(schema["properties"]["resolvers"]["type"], @r#""object""#);
    }
}
