//! Parameterized templates: traits and resource types.
//!
//! Both are kept as raw YAML until they are applied, because `<<param>>`
//! placeholders may appear anywhere, including in map keys.

use indexmap::IndexMap;
use ramlgen_core::{to_camel_case, to_pascal_case, to_snake_case};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

use super::{Method, Resource};
use crate::{
    de::scalar_to_string,
    error::{Error, ReferenceKind, Result},
};

/// Parameter values available to a template instantiation.
pub type TemplateParams = IndexMap<String, Value>;

/// Reserved parameter: the full relative URI of the resource.
pub const RESOURCE_PATH: &str = "resourcePath";
/// Reserved parameter: the rightmost non-parameter segment of the URI.
pub const RESOURCE_PATH_NAME: &str = "resourcePathName";
/// Reserved parameter: the verb of the method a trait is applied to.
pub const METHOD_NAME: &str = "methodName";

/// Raw template body plus the fields every template carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    /// Assigned from the declaration key during resolution
    pub name: String,
    pub usage: Option<String>,
    body: Value,
}

impl Template {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Mapping(mut map) => {
                let usage = map.remove("usage").as_ref().and_then(scalar_to_string);
                Self {
                    name: String::new(),
                    usage,
                    body: Value::Mapping(map),
                }
            }
            Value::Null => Self::default(),
            body => Self {
                name: String::new(),
                usage: None,
                body,
            },
        }
    }

    /// The template with every placeholder substituted.
    pub fn instantiate(&self, params: &TemplateParams, context: &str) -> Result<Value> {
        substitute_value(&self.body, params, context)
    }
}

impl<'de> Deserialize<'de> for Template {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// A reusable bundle of method facets.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Trait {
    pub template: Template,
}

impl Trait {
    pub fn name(&self) -> &str {
        &self.template.name
    }

    /// Instantiate the trait into a method fragment.
    pub fn instantiate(&self, params: &TemplateParams) -> Result<Method> {
        let context = format!("trait '{}'", self.name());
        let value = self.template.instantiate(params, &context)?;
        match value {
            Value::Null => Ok(Method::default()),
            value => serde_yaml::from_value(value).map_err(|e| Error::fragment(context, e)),
        }
    }
}

/// A reusable resource shape.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ResourceType {
    pub template: Template,
}

impl ResourceType {
    pub fn name(&self) -> &str {
        &self.template.name
    }

    /// Instantiate the resource type into a resource fragment.
    pub fn instantiate(&self, params: &TemplateParams) -> Result<Resource> {
        let context = format!("resource type '{}'", self.name());
        let value = self.template.instantiate(params, &context)?;
        match value {
            Value::Null => Ok(Resource::default()),
            value => serde_yaml::from_value(value).map_err(|e| Error::fragment(context, e)),
        }
    }
}

fn substitute_value(value: &Value, params: &TemplateParams, context: &str) -> Result<Value> {
    Ok(match value {
        Value::String(s) => substitute_whole(s, params, context)?,
        Value::Sequence(items) => Value::Sequence(
            items
                .iter()
                .map(|item| substitute_value(item, params, context))
                .collect::<Result<_>>()?,
        ),
        Value::Mapping(map) => {
            let mut out = serde_yaml::Mapping::new();
            for (key, item) in map {
                out.insert(
                    substitute_value(key, params, context)?,
                    substitute_value(item, params, context)?,
                );
            }
            Value::Mapping(out)
        }
        other => other.clone(),
    })
}

/// A string that is exactly one placeholder takes the parameter value
/// as is, so list parameters stay lists.
fn substitute_whole(s: &str, params: &TemplateParams, context: &str) -> Result<Value> {
    if let Some(inner) = s.strip_prefix("<<").and_then(|r| r.strip_suffix(">>"))
        && !inner.contains("<<")
        && !inner.contains('|')
    {
        let name = inner.trim();
        return params
            .get(name)
            .cloned()
            .ok_or_else(|| Error::reference(ReferenceKind::TemplateParameter, name, context));
    }
    substitute_str(s, params, context).map(Value::String)
}

/// Replace every `<<name | !fn | !fn>>` placeholder in a string.
pub fn substitute_str(s: &str, params: &TemplateParams, context: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("<<") {
        let Some(len) = rest[start + 2..].find(">>") else {
            break;
        };
        out.push_str(&rest[..start]);
        let placeholder = &rest[start + 2..start + 2 + len];
        out.push_str(&expand_placeholder(placeholder, params, context)?);
        rest = &rest[start + 2 + len + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

fn expand_placeholder(placeholder: &str, params: &TemplateParams, context: &str) -> Result<String> {
    let mut parts = placeholder.split('|').map(str::trim);
    let name = parts.next().unwrap_or_default();
    let mut value = params
        .get(name)
        .and_then(scalar_to_string)
        .ok_or_else(|| Error::reference(ReferenceKind::TemplateParameter, name, context))?;
    for function in parts {
        value = apply_function(function, &value)
            .ok_or_else(|| Error::reference(ReferenceKind::TemplateFunction, function, context))?;
    }
    Ok(value)
}

fn apply_function(function: &str, value: &str) -> Option<String> {
    let transformed = match function.strip_prefix('!')?.trim() {
        "singularize" => singularize(value),
        "pluralize" => pluralize(value),
        "uppercase" => value.to_uppercase(),
        "lowercase" => value.to_lowercase(),
        "lowercamelcase" => to_camel_case(value),
        "uppercamelcase" => to_pascal_case(value),
        "lowerunderscorecase" => to_snake_case(value),
        "upperunderscorecase" => to_snake_case(value).to_uppercase(),
        "lowerhyphencase" => to_snake_case(value).replace('_', "-"),
        "upperhyphencase" => to_snake_case(value).replace('_', "-").to_uppercase(),
        _ => return None,
    };
    Some(transformed)
}

const SIBILANT_SUFFIXES: [&str; 5] = ["s", "x", "z", "ch", "sh"];

fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    for suffix in SIBILANT_SUFFIXES {
        if let Some(stem) = word.strip_suffix(&format!("{suffix}es")) {
            return format!("{stem}{suffix}");
        }
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.ends_with('s') => stem.to_string(),
        _ => word.to_string(),
    }
}

fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y')
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        return format!("{stem}ies");
    }
    if SIBILANT_SUFFIXES.iter().any(|suffix| word.ends_with(suffix)) {
        return format!("{word}es");
    }
    format!("{word}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> TemplateParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn test_substitute_with_functions() {
        let params = params(&[("resourcePathName", "users"), ("item", "user_profile")]);
        let out = substitute_str(
            "<<resourcePathName | !singularize>> of <<item|!uppercamelcase>>",
            &params,
            "test",
        )
        .unwrap();
        assert_eq!(out, "user of UserProfile");
    }

    #[test]
    fn test_all_case_functions() {
        let cases = [
            ("!uppercase", "UserProfile", "USERPROFILE"),
            ("!lowercase", "UserProfile", "userprofile"),
            ("!lowercamelcase", "user_profile", "userProfile"),
            ("!uppercamelcase", "user-profile", "UserProfile"),
            ("!lowerunderscorecase", "UserProfile", "user_profile"),
            ("!upperunderscorecase", "UserProfile", "USER_PROFILE"),
            ("!lowerhyphencase", "UserProfile", "user-profile"),
            ("!upperhyphencase", "UserProfile", "USER-PROFILE"),
        ];
        for (function, input, expected) in cases {
            assert_eq!(apply_function(function, input).as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_inflection() {
        assert_eq!(singularize("users"), "user");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("address"), "address");
        assert_eq!(pluralize("user"), "users");
        assert_eq!(pluralize("category"), "categories");
        assert_eq!(pluralize("key"), "keys");
        assert_eq!(pluralize("box"), "boxes");
    }

    #[test]
    fn test_missing_parameter_is_reference_error() {
        let err = substitute_str("<<item>>", &TemplateParams::new(), "trait 'paged'").unwrap_err();
        assert!(matches!(
            *err,
            Error::Reference {
                kind: ReferenceKind::TemplateParameter,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_function_is_reference_error() {
        let params = params(&[("item", "user")]);
        let err = substitute_str("<<item | !shout>>", &params, "trait 'paged'").unwrap_err();
        assert!(matches!(
            *err,
            Error::Reference {
                kind: ReferenceKind::TemplateFunction,
                ..
            }
        ));
    }

    #[test]
    fn test_trait_instantiation_substitutes_keys() {
        let yaml = r#"
usage: Apply to collections
queryParameters:
  <<name>>:
    type: integer
description: Paged <<resourcePathName>>
"#;
        let mut paged: Trait = serde_yaml::from_str(yaml).unwrap();
        paged.template.name = "paged".into();
        assert_eq!(paged.template.usage.as_deref(), Some("Apply to collections"));

        let method = paged
            .instantiate(&params(&[("name", "page"), ("resourcePathName", "users")]))
            .unwrap();
        assert_eq!(method.description.as_deref(), Some("Paged users"));
        assert_eq!(method.query_parameters["page"].type_name, "integer");
    }

    #[test]
    fn test_whole_placeholder_keeps_list_value() {
        let mut params = TemplateParams::new();
        params.insert(
            "scopes".into(),
            Value::Sequence(vec!["read".into(), "write".into()]),
        );
        let out = substitute_value(&Value::String("<<scopes>>".into()), &params, "test").unwrap();
        assert!(matches!(out, Value::Sequence(ref items) if items.len() == 2));
    }
}
