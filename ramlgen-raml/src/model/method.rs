use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

use super::{DefinitionChoice, Property};
use crate::de::{choices, properties, scalar_to_string, string_keyed};

/// HTTP verbs a resource can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
    Connect,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 9] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Trace,
        HttpMethod::Connect,
    ];

    /// Lowercase verb as written in RAML (`get`)
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Trace => "trace",
            HttpMethod::Connect => "connect",
        }
    }

    /// Uppercase verb as sent on the wire (`GET`)
    pub fn as_upper(self) -> String {
        self.as_str().to_uppercase()
    }

    /// Whether requests with this verb carry a body.
    pub fn has_body(self) -> bool {
        matches!(self, HttpMethod::Put | HttpMethod::Post | HttpMethod::Patch)
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown HTTP method: {s}"))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request or response body.
///
/// Accepts `body: Pet`, `body: { type: Pet }` and
/// `body: { application/json: { type: Pet } }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct Body {
    pub media_type: Option<String>,
    pub type_name: Option<String>,
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        match value {
            Value::String(type_name) => Self {
                media_type: None,
                type_name: Some(type_name),
            },
            Value::Mapping(map) => {
                if let Some(type_name) = map.get("type").and_then(scalar_to_string) {
                    return Self {
                        media_type: None,
                        type_name: Some(type_name),
                    };
                }
                let media = map.into_iter().find_map(|(key, value)| {
                    let key = scalar_to_string(&key).filter(|k| k.contains('/'))?;
                    Some((key, value))
                });
                match media {
                    Some((media_type, value)) => Self {
                        media_type: Some(media_type),
                        type_name: Self::from(value).type_name,
                    },
                    None => Self::default(),
                }
            }
            _ => Self::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub description: Option<String>,
    #[serde(default, deserialize_with = "properties")]
    pub headers: IndexMap<String, Property>,
    pub body: Option<Body>,
}

/// An operation on a resource.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub display_name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "properties")]
    pub headers: IndexMap<String, Property>,
    #[serde(default, deserialize_with = "properties")]
    pub query_parameters: IndexMap<String, Property>,
    pub body: Option<Body>,
    #[serde(default, deserialize_with = "string_keyed")]
    pub responses: IndexMap<String, Response>,
    #[serde(default, deserialize_with = "choices")]
    pub is: Vec<DefinitionChoice>,
    #[serde(default, deserialize_with = "choices")]
    pub secured_by: Vec<DefinitionChoice>,
    /// Names of the traits applied during resolution
    #[serde(skip)]
    pub traits: Vec<String>,
}

impl Method {
    /// Fill gaps from an inherited fragment (trait or resource type).
    ///
    /// Values declared on `self` are kept; only absent ones are taken over.
    pub fn inherit(&mut self, inherited: Method) {
        if self.display_name.is_none() {
            self.display_name = inherited.display_name;
        }
        if self.description.is_none() {
            self.description = inherited.description;
        }
        if self.body.is_none() {
            self.body = inherited.body;
        }
        for (name, header) in inherited.headers {
            self.headers.entry(name).or_insert(header);
        }
        for (name, param) in inherited.query_parameters {
            self.query_parameters.entry(name).or_insert(param);
        }
        for (code, response) in inherited.responses {
            self.responses.entry(code).or_insert(response);
        }
        for choice in inherited.is {
            if !self.is.iter().any(|c| c.name == choice.name) {
                self.is.push(choice);
            }
        }
        if self.secured_by.is_empty() {
            self.secured_by = inherited.secured_by;
        }
    }

    /// Qualify unqualified trait and security references with a library alias.
    pub fn qualify_references(&mut self, alias: &str) {
        for choice in self.is.iter_mut().chain(self.secured_by.iter_mut()) {
            choice.qualify(alias);
        }
    }

    /// Type names mentioned by the method's body and parameters.
    pub fn type_references(&self) -> Vec<String> {
        let mut names = Vec::new();
        let bodies = self
            .body
            .iter()
            .chain(self.responses.values().filter_map(|r| r.body.as_ref()));
        for body in bodies {
            if let Some(type_name) = &body.type_name {
                names.extend(super::TypeExpr::parse(type_name).names());
            }
        }
        for property in self.headers.values().chain(self.query_parameters.values()) {
            names.extend(property.type_expr().names());
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbs() {
        assert_eq!("patch".parse::<HttpMethod>(), Ok(HttpMethod::Patch));
        assert!("GET".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::Delete.as_upper(), "DELETE");
        assert!(HttpMethod::Post.has_body());
        assert!(!HttpMethod::Get.has_body());
    }

    #[test]
    fn test_body_forms() {
        let short: Body = serde_yaml::from_str("Pet").unwrap();
        assert_eq!(short.type_name.as_deref(), Some("Pet"));

        let typed: Body = serde_yaml::from_str("type: Pet").unwrap();
        assert_eq!(typed.type_name.as_deref(), Some("Pet"));

        let media: Body = serde_yaml::from_str("application/json:\n  type: Pet[]\n").unwrap();
        assert_eq!(media.media_type.as_deref(), Some("application/json"));
        assert_eq!(media.type_name.as_deref(), Some("Pet[]"));
    }

    #[test]
    fn test_method_with_responses() {
        let yaml = r#"
description: List users
queryParameters:
  page?: integer
responses:
  200:
    body:
      application/json:
        type: User[]
  404:
is: [paged]
securedBy: [null, oauth2]
"#;
        let method: Method = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(method.description.as_deref(), Some("List users"));
        assert!(!method.query_parameters["page"].required);
        assert_eq!(method.responses.len(), 2);
        assert_eq!(method.responses["404"], Response::default());
        assert_eq!(method.is[0].name, "paged");
        assert_eq!(method.secured_by.len(), 1);
        assert_eq!(method.type_references(), ["User", "integer"]);
    }

    #[test]
    fn test_inherit_keeps_explicit_values() {
        let mut explicit = Method {
            description: Some("mine".into()),
            ..Method::default()
        };
        explicit
            .query_parameters
            .insert("page".into(), Property::of_type("integer"));

        let mut inherited = Method {
            description: Some("theirs".into()),
            display_name: Some("List".into()),
            ..Method::default()
        };
        inherited
            .query_parameters
            .insert("page".into(), Property::of_type("string"));
        inherited
            .query_parameters
            .insert("limit".into(), Property::of_type("integer"));

        explicit.inherit(inherited);

        assert_eq!(explicit.description.as_deref(), Some("mine"));
        assert_eq!(explicit.display_name.as_deref(), Some("List"));
        assert_eq!(explicit.query_parameters["page"].type_name, "integer");
        assert_eq!(explicit.query_parameters["limit"].type_name, "integer");
    }
}
