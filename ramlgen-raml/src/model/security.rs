use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de::Error as _};
use serde_yaml::Value;

use super::Method;
use crate::{
    de::{null_as_default, scalar_to_string},
    namespace::split_qualified,
};

/// A reference to a declaration, optionally with parameters.
///
/// Accepts `oauth2` and `oauth2: { scopes: [read] }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionChoice {
    pub name: String,
    pub parameters: IndexMap<String, Value>,
}

impl DefinitionChoice {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: IndexMap::new(),
        }
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// The library alias and bare name of the reference.
    pub fn split(&self) -> (Option<&str>, &str) {
        split_qualified(&self.name)
    }

    pub fn is_qualified(&self) -> bool {
        self.split().0.is_some()
    }

    /// Prefix an unqualified reference with a library alias.
    pub fn qualify(&mut self, alias: &str) {
        if !self.is_qualified() {
            self.name = format!("{alias}.{}", self.name);
        }
    }

    /// String values of a list parameter, e.g. OAuth 2.0 `scopes`.
    ///
    /// Returns `None` when the parameter is present but not a list of scalars.
    pub fn string_list(&self, key: &str) -> Option<Vec<String>> {
        match self.parameters.get(key) {
            None | Some(Value::Null) => Some(Vec::new()),
            Some(Value::Sequence(items)) => items.iter().map(scalar_to_string).collect(),
            Some(_) => None,
        }
    }

    fn from_value(value: Value) -> std::result::Result<Self, String> {
        match value {
            Value::String(name) => Ok(Self::new(name)),
            Value::Mapping(map) if map.len() == 1 => {
                let Some((key, params)) = map.into_iter().next() else {
                    return Err("empty reference".to_string());
                };
                let name =
                    scalar_to_string(&key).ok_or_else(|| "reference name must be a string".to_string())?;
                let parameters = match params {
                    Value::Null => IndexMap::new(),
                    Value::Mapping(params) => params
                        .into_iter()
                        .map(|(k, v)| {
                            scalar_to_string(&k)
                                .map(|k| (k, v))
                                .ok_or_else(|| format!("parameter names of '{name}' must be strings"))
                        })
                        .collect::<std::result::Result<_, _>>()?,
                    _ => return Err(format!("parameters of '{name}' must be a map")),
                };
                Ok(Self { name, parameters })
            }
            Value::Mapping(_) => Err("expected a single-key map".to_string()),
            _ => Err("expected a name or a single-key map".to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for DefinitionChoice {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

impl fmt::Display for DefinitionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Known security scheme types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemeKind {
    OAuth2,
    OAuth1,
    Basic,
    Digest,
    PassThrough,
    Other(String),
}

impl SchemeKind {
    pub fn from_type(kind: &str) -> Self {
        match kind {
            "OAuth 2.0" => Self::OAuth2,
            "OAuth 1.0" => Self::OAuth1,
            "Basic Authentication" => Self::Basic,
            "Digest Authentication" => Self::Digest,
            "Pass Through" => Self::PassThrough,
            other => Self::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub kind: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: IndexMap<String, Value>,
    pub described_by: Option<Method>,
}

impl SecurityScheme {
    pub fn scheme_kind(&self) -> SchemeKind {
        SchemeKind::from_type(&self.kind)
    }

    /// Scopes declared in the scheme settings.
    pub fn declared_scopes(&self) -> Vec<String> {
        match self.settings.get("scopes") {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            _ => Vec::new(),
        }
    }

    /// Header names the scheme expects, from `describedBy`.
    pub fn header_names(&self) -> Vec<String> {
        self.described_by
            .as_ref()
            .map(|method| method.headers.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_choice() {
        let choice: DefinitionChoice = serde_yaml::from_str("oauth2").unwrap();
        assert_eq!(choice.name, "oauth2");
        assert!(choice.parameters.is_empty());
    }

    #[test]
    fn test_map_choice_with_parameters() {
        let choice: DefinitionChoice =
            serde_yaml::from_str("oauth2:\n  scopes: [read, write]\n").unwrap();
        assert_eq!(choice.name, "oauth2");
        assert_eq!(
            choice.string_list("scopes"),
            Some(vec!["read".to_string(), "write".to_string()])
        );
    }

    #[test]
    fn test_malformed_scopes() {
        let choice: DefinitionChoice = serde_yaml::from_str("oauth2:\n  scopes: read\n").unwrap();
        assert_eq!(choice.string_list("scopes"), None);
    }

    #[test]
    fn test_multi_key_map_rejected() {
        let result = serde_yaml::from_str::<DefinitionChoice>("a: 1\nb: 2\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_qualify_only_unqualified() {
        let mut local = DefinitionChoice::new("paged");
        local.qualify("common");
        assert_eq!(local.name, "common.paged");

        let mut qualified = DefinitionChoice::new("other.paged");
        qualified.qualify("common");
        assert_eq!(qualified.name, "other.paged");
        assert_eq!(qualified.split(), (Some("other"), "paged"));
    }

    #[test]
    fn test_scheme() {
        let yaml = r#"
type: OAuth 2.0
description: Bearer tokens
describedBy:
  headers:
    Authorization: string
settings:
  scopes: [admin, user]
"#;
        let scheme: SecurityScheme = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(scheme.scheme_kind(), SchemeKind::OAuth2);
        assert_eq!(scheme.declared_scopes(), ["admin", "user"]);
        assert_eq!(scheme.header_names(), ["Authorization"]);
    }
}
