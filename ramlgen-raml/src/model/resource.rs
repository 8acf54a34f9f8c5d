use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

use super::{DefinitionChoice, HttpMethod, Method, Property};
use crate::de::{choices, optional_choice, properties};

/// A resource as written in a document, before resolution.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawResource")]
pub struct Resource {
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// Applied resource type (`type:`)
    pub resource_type: Option<DefinitionChoice>,
    pub is: Vec<DefinitionChoice>,
    pub secured_by: Vec<DefinitionChoice>,
    pub uri_parameters: IndexMap<String, Property>,
    pub methods: IndexMap<HttpMethod, Method>,
    /// Methods declared as `get?:`, only meaningful inside resource types
    pub optional_methods: Vec<HttpMethod>,
    /// Nested resources keyed by relative URI
    pub resources: IndexMap<String, Resource>,
}

impl Resource {
    /// Merge an instantiated resource type into this resource.
    ///
    /// Explicit values win. Optional methods of the fragment are applied
    /// only to methods this resource already declares, unless `self` is
    /// itself a resource type fragment, in which case they stay optional.
    pub fn inherit(&mut self, fragment: Resource, as_template: bool) {
        if self.display_name.is_none() {
            self.display_name = fragment.display_name;
        }
        if self.description.is_none() {
            self.description = fragment.description;
        }
        for choice in fragment.is {
            if !self.is.iter().any(|c| c.name == choice.name) {
                self.is.push(choice);
            }
        }
        if self.secured_by.is_empty() {
            self.secured_by = fragment.secured_by;
        }
        for (name, param) in fragment.uri_parameters {
            self.uri_parameters.entry(name).or_insert(param);
        }
        for (verb, inherited) in fragment.methods {
            let optional = fragment.optional_methods.contains(&verb);
            if let Some(explicit) = self.methods.get_mut(&verb) {
                explicit.inherit(inherited);
            } else if !optional {
                self.methods.insert(verb, inherited);
                self.optional_methods.retain(|m| *m != verb);
            } else if as_template {
                self.methods.insert(verb, inherited);
                self.optional_methods.push(verb);
            }
        }
    }

    /// Qualify unqualified trait, security and resource type references
    /// with a library alias.
    pub fn qualify_references(&mut self, alias: &str) {
        if let Some(resource_type) = &mut self.resource_type {
            resource_type.qualify(alias);
        }
        for choice in self.is.iter_mut().chain(self.secured_by.iter_mut()) {
            choice.qualify(alias);
        }
        for method in self.methods.values_mut() {
            method.qualify_references(alias);
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResource {
    display_name: Option<String>,
    description: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "optional_choice")]
    resource_type: Option<DefinitionChoice>,
    #[serde(default, deserialize_with = "choices")]
    is: Vec<DefinitionChoice>,
    #[serde(default, deserialize_with = "choices")]
    secured_by: Vec<DefinitionChoice>,
    #[serde(default, deserialize_with = "properties")]
    uri_parameters: IndexMap<String, Property>,
    #[serde(flatten)]
    members: IndexMap<String, Value>,
}

impl TryFrom<RawResource> for Resource {
    type Error = serde_yaml::Error;

    fn try_from(raw: RawResource) -> Result<Self, Self::Error> {
        let members = Members::split(raw.members)?;
        Ok(Self {
            display_name: raw.display_name,
            description: raw.description,
            resource_type: raw.resource_type,
            is: raw.is,
            secured_by: raw.secured_by,
            uri_parameters: raw.uri_parameters,
            methods: members.methods,
            optional_methods: members.optional_methods,
            resources: members.resources,
        })
    }
}

/// Keys of a resource (or of the root) that are not fixed facets:
/// nested resources (`/users`) and methods (`get`, `get?`).
#[derive(Default)]
pub(crate) struct Members {
    pub methods: IndexMap<HttpMethod, Method>,
    pub optional_methods: Vec<HttpMethod>,
    pub resources: IndexMap<String, Resource>,
}

impl Members {
    pub(crate) fn split(members: IndexMap<String, Value>) -> Result<Self, serde_yaml::Error> {
        let mut split = Members::default();
        for (key, value) in members {
            if key.starts_with('/') {
                let resource = match value {
                    Value::Null => Resource::default(),
                    value => serde_yaml::from_value(value)?,
                };
                split.resources.insert(key, resource);
                continue;
            }

            let (verb, optional) = match key.strip_suffix('?') {
                Some(verb) => (verb, true),
                None => (key.as_str(), false),
            };
            // Anything else (annotations, documentation, ...) is not modelled
            let Ok(verb) = verb.parse::<HttpMethod>() else {
                continue;
            };
            let method = match value {
                Value::Null => Method::default(),
                value => serde_yaml::from_value(value)?,
            };
            if optional {
                split.optional_methods.push(verb);
            }
            split.methods.insert(verb, method);
        }
        Ok(split)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_resources_and_methods() {
        let yaml = r#"
description: Users
uriParameters:
  userId: integer
get:
post:
  body: User
/{userId}:
  get:
  /address:
"#;
        let resource: Resource = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(resource.description.as_deref(), Some("Users"));
        assert_eq!(
            resource.methods.keys().copied().collect::<Vec<_>>(),
            [HttpMethod::Get, HttpMethod::Post]
        );
        assert_eq!(resource.uri_parameters["userId"].type_name, "integer");

        let child = &resource.resources["/{userId}"];
        assert!(child.methods.contains_key(&HttpMethod::Get));
        assert_eq!(child.resources["/address"], Resource::default());
    }

    #[test]
    fn test_optional_methods_and_type() {
        let yaml = r#"
type: { collection: { item: User } }
is: [paged]
get?:
  description: maybe
"#;
        let resource: Resource = serde_yaml::from_str(yaml).unwrap();
        let resource_type = resource.resource_type.as_ref().unwrap();
        assert_eq!(resource_type.name, "collection");
        assert_eq!(resource.optional_methods, [HttpMethod::Get]);
        assert_eq!(resource.is[0].name, "paged");
    }

    #[test]
    fn test_inherit_optional_method_requires_declaration() {
        let mut fragment = Resource::default();
        fragment.methods.insert(HttpMethod::Get, Method::default());
        fragment.methods.insert(
            HttpMethod::Delete,
            Method {
                description: Some("remove".into()),
                ..Method::default()
            },
        );
        fragment.optional_methods.push(HttpMethod::Delete);

        let mut plain = Resource::default();
        plain.inherit(fragment.clone(), false);
        assert!(plain.methods.contains_key(&HttpMethod::Get));
        assert!(!plain.methods.contains_key(&HttpMethod::Delete));

        let mut declares = Resource::default();
        declares.methods.insert(HttpMethod::Delete, Method::default());
        declares.inherit(fragment, false);
        assert_eq!(
            declares.methods[&HttpMethod::Delete].description.as_deref(),
            Some("remove")
        );
    }

    #[test]
    fn test_qualify_references() {
        let yaml = r#"
type: collection
is: [paged, other.secured]
get:
  securedBy: [oauth2]
"#;
        let mut resource: Resource = serde_yaml::from_str(yaml).unwrap();
        resource.qualify_references("common");

        assert_eq!(resource.resource_type.unwrap().name, "common.collection");
        assert_eq!(resource.is[0].name, "common.paged");
        assert_eq!(resource.is[1].name, "other.secured");
        assert_eq!(
            resource.methods[&HttpMethod::Get].secured_by[0].name,
            "common.oauth2"
        );
    }
}
