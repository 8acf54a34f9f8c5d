use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

use super::{DefinitionChoice, Resource, ResourceType, SecurityScheme, Trait, Type};
use crate::{
    de::{choices, null_as_default, optional_scalar},
    model::resource::Members,
};

/// Declarations shared by the root document and libraries.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declarations {
    #[serde(default, deserialize_with = "null_as_default")]
    pub types: IndexMap<String, Type>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub traits: IndexMap<String, Trait>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_types: IndexMap<String, ResourceType>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub security_schemes: IndexMap<String, SecurityScheme>,
    /// Library alias -> declared file path
    #[serde(default, deserialize_with = "null_as_default")]
    pub uses: IndexMap<String, String>,
    /// Loaded libraries keyed by alias, filled in by the resolver
    #[serde(skip)]
    pub libraries: IndexMap<String, Library>,
}

impl Declarations {
    /// Assign every trait and resource type its declaration key as name,
    /// here and in every loaded library.
    pub fn assign_template_names(&mut self) {
        for (name, declared) in &mut self.traits {
            declared.template.name = name.clone();
        }
        for (name, declared) in &mut self.resource_types {
            declared.template.name = name.clone();
        }
        for library in self.libraries.values_mut() {
            library.declarations.assign_template_names();
        }
    }
}

/// A library document imported through `uses`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Library {
    /// Declared path, relative to the importing document
    #[serde(skip)]
    pub path: String,
    #[serde(default)]
    pub usage: Option<String>,
    #[serde(flatten)]
    pub declarations: Declarations,
}

/// The root document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawApiDefinition")]
pub struct ApiDefinition {
    pub title: String,
    pub description: Option<String>,
    pub version: Option<String>,
    pub base_uri: Option<String>,
    pub media_type: Option<String>,
    pub protocols: Vec<String>,
    pub secured_by: Vec<DefinitionChoice>,
    pub declarations: Declarations,
    /// Root resources keyed by URI
    pub resources: IndexMap<String, Resource>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawApiDefinition {
    title: String,
    description: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    version: Option<String>,
    base_uri: Option<String>,
    media_type: Option<OneOrMany>,
    #[serde(default, deserialize_with = "null_as_default")]
    protocols: Vec<String>,
    #[serde(default, deserialize_with = "choices")]
    secured_by: Vec<DefinitionChoice>,
    #[serde(default, deserialize_with = "null_as_default")]
    types: IndexMap<String, Type>,
    #[serde(default, deserialize_with = "null_as_default")]
    traits: IndexMap<String, Trait>,
    #[serde(default, deserialize_with = "null_as_default")]
    resource_types: IndexMap<String, ResourceType>,
    #[serde(default, deserialize_with = "null_as_default")]
    security_schemes: IndexMap<String, SecurityScheme>,
    #[serde(default, deserialize_with = "null_as_default")]
    uses: IndexMap<String, String>,
    #[serde(flatten)]
    members: IndexMap<String, Value>,
}

impl TryFrom<RawApiDefinition> for ApiDefinition {
    type Error = serde_yaml::Error;

    fn try_from(raw: RawApiDefinition) -> Result<Self, Self::Error> {
        let members = Members::split(raw.members)?;
        let media_type = raw.media_type.and_then(|media| match media {
            OneOrMany::One(media) => Some(media),
            OneOrMany::Many(all) => all.into_iter().next(),
        });
        Ok(Self {
            title: raw.title,
            description: raw.description,
            version: raw.version,
            base_uri: raw.base_uri,
            media_type,
            protocols: raw.protocols,
            secured_by: raw.secured_by,
            declarations: Declarations {
                types: raw.types,
                traits: raw.traits,
                resource_types: raw.resource_types,
                security_schemes: raw.security_schemes,
                uses: raw.uses,
                libraries: IndexMap::new(),
            },
            resources: members.resources,
        })
    }
}
