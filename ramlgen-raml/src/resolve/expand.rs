//! Resource tree expansion: resource types, traits and security inheritance.

use indexmap::IndexMap;
use serde_yaml::Value;
use tracing::debug;

use super::{
    check_type_reference,
    model::{ResourceId, ResourceNode},
};
use crate::{
    error::{Error, ReferenceKind, Result},
    model::{
        DefinitionChoice, HttpMethod, METHOD_NAME, Method, RESOURCE_PATH, RESOURCE_PATH_NAME,
        Resource, TemplateParams,
    },
    namespace::Namespace,
};

/// Builds the resolved resource arena from the declared resource tree.
pub(super) struct Expander<'a> {
    ns: Namespace<'a>,
    api_secured_by: &'a [DefinitionChoice],
    nodes: Vec<ResourceNode>,
    roots: Vec<ResourceId>,
}

impl<'a> Expander<'a> {
    pub(super) fn new(ns: Namespace<'a>, api_secured_by: &'a [DefinitionChoice]) -> Self {
        Self {
            ns,
            api_secured_by,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub(super) fn expand_all(
        mut self,
        resources: IndexMap<String, Resource>,
    ) -> Result<(Vec<ResourceNode>, Vec<ResourceId>)> {
        for (uri, resource) in resources {
            self.expand(uri, resource, None, "")?;
        }
        Ok((self.nodes, self.roots))
    }

    fn expand(
        &mut self,
        uri: String,
        mut resource: Resource,
        parent: Option<ResourceId>,
        parent_uri: &str,
    ) -> Result<()> {
        let full_uri = format!("{parent_uri}{uri}");
        let children = std::mem::take(&mut resource.resources);

        let resource_type = self.apply_resource_type(&mut resource, &full_uri)?;
        self.apply_traits(&mut resource, &full_uri)?;
        self.apply_security(&mut resource, &full_uri)?;
        self.check_types(&resource, &full_uri)?;

        let id = ResourceId(self.nodes.len());
        self.nodes.push(ResourceNode {
            id,
            uri,
            full_uri: full_uri.clone(),
            parent,
            children: Vec::new(),
            display_name: resource.display_name,
            description: resource.description,
            resource_type,
            uri_parameters: resource.uri_parameters,
            methods: resource.methods,
        });
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.roots.push(id),
        }

        for (child_uri, child) in children {
            self.expand(child_uri, child, Some(id), &full_uri)?;
        }
        Ok(())
    }

    fn apply_resource_type(
        &self,
        resource: &mut Resource,
        full_uri: &str,
    ) -> Result<Option<String>> {
        let Some(choice) = resource.resource_type.take() else {
            return Ok(None);
        };
        let mut chain = Vec::new();
        let fragment = self.instantiate_resource_type(&choice, full_uri, &mut chain)?;
        debug!(resource = full_uri, resource_type = %choice, "applied resource type");
        resource.inherit(fragment, false);
        Ok(Some(choice.name))
    }

    fn instantiate_resource_type(
        &self,
        choice: &DefinitionChoice,
        full_uri: &str,
        chain: &mut Vec<String>,
    ) -> Result<Resource> {
        let context = format!("resource {full_uri}");
        if chain.contains(&choice.name) {
            chain.push(choice.name.clone());
            return Err(Error::reference(
                ReferenceKind::ResourceType,
                &choice.name,
                format!("{context} (cycle {})", chain.join(" -> ")),
            ));
        }
        chain.push(choice.name.clone());

        let (owner, bare) = self.ns.resolve_qualified_name(
            &choice.name,
            self.ns.root(),
            ReferenceKind::ResourceType,
            &context,
        )?;
        let declared = owner
            .declarations()
            .and_then(|declarations| declarations.resource_types.get(bare))
            .ok_or_else(|| Error::reference(ReferenceKind::ResourceType, &choice.name, &context))?;

        let params = template_params(&choice.parameters, full_uri, None);
        let mut fragment = declared.instantiate(&params)?;
        if let Some(alias) = owner.alias() {
            fragment.qualify_references(alias);
        }
        if let Some(parent) = fragment.resource_type.take() {
            let inherited = self.instantiate_resource_type(&parent, full_uri, chain)?;
            fragment.inherit(inherited, true);
        }
        Ok(fragment)
    }

    fn apply_traits(&self, resource: &mut Resource, full_uri: &str) -> Result<()> {
        for (verb, method) in resource.methods.iter_mut() {
            let mut applied: Vec<DefinitionChoice> = Vec::new();
            for choice in resource.is.iter().chain(method.is.iter()) {
                if !applied.iter().any(|c| c.name == choice.name) {
                    applied.push(choice.clone());
                }
            }
            for choice in applied {
                let fragment = self.instantiate_trait(&choice, *verb, full_uri)?;
                method.inherit(fragment);
                method.traits.push(choice.name);
            }
        }
        Ok(())
    }

    fn instantiate_trait(
        &self,
        choice: &DefinitionChoice,
        verb: HttpMethod,
        full_uri: &str,
    ) -> Result<Method> {
        let context = format!("{} {full_uri}", verb.as_upper());
        let (owner, bare) =
            self.ns
                .resolve_qualified_name(&choice.name, self.ns.root(), ReferenceKind::Trait, &context)?;
        let declared = owner
            .declarations()
            .and_then(|declarations| declarations.traits.get(bare))
            .ok_or_else(|| Error::reference(ReferenceKind::Trait, &choice.name, &context))?;

        let params = template_params(&choice.parameters, full_uri, Some(verb));
        let mut fragment = declared.instantiate(&params)?;
        fragment.is.clear();
        if let Some(alias) = owner.alias() {
            fragment.qualify_references(alias);
        }
        Ok(fragment)
    }

    /// `securedBy` falls back from method to resource to API. Qualified
    /// references must name an imported library; unknown bare names are
    /// left for the emitter to skip.
    fn apply_security(&self, resource: &mut Resource, full_uri: &str) -> Result<()> {
        for (verb, method) in resource.methods.iter_mut() {
            if method.secured_by.is_empty() {
                method.secured_by = if resource.secured_by.is_empty() {
                    self.api_secured_by.to_vec()
                } else {
                    resource.secured_by.clone()
                };
            }
            let context = format!("{} {full_uri}", verb.as_upper());
            for choice in method.secured_by.iter().filter(|c| c.is_qualified()) {
                self.ns.resolve_qualified_name(
                    &choice.name,
                    self.ns.root(),
                    ReferenceKind::SecurityScheme,
                    &context,
                )?;
            }
        }
        Ok(())
    }

    fn check_types(&self, resource: &Resource, full_uri: &str) -> Result<()> {
        let root = self.ns.root();
        for property in resource.uri_parameters.values() {
            for name in property.type_expr().names() {
                check_type_reference(&self.ns, root, &name, &format!("resource {full_uri}"))?;
            }
        }
        for (verb, method) in &resource.methods {
            let context = format!("{} {full_uri}", verb.as_upper());
            for name in method.type_references() {
                check_type_reference(&self.ns, root, &name, &context)?;
            }
        }
        Ok(())
    }
}

/// Declared choice parameters plus the reserved ones.
fn template_params(
    declared: &IndexMap<String, Value>,
    full_uri: &str,
    verb: Option<HttpMethod>,
) -> TemplateParams {
    let mut params = declared.clone();
    params.insert(RESOURCE_PATH.to_string(), Value::String(full_uri.to_string()));
    params.insert(
        RESOURCE_PATH_NAME.to_string(),
        Value::String(resource_path_name(full_uri).to_string()),
    );
    if let Some(verb) = verb {
        params.insert(METHOD_NAME.to_string(), Value::String(verb.as_str().to_string()));
    }
    params
}

/// Rightmost URI segment that is not a parameter (`/users/{id}` -> `users`).
pub(crate) fn resource_path_name(full_uri: &str) -> &str {
    full_uri
        .rsplit('/')
        .find(|segment| !segment.is_empty() && !segment.contains('{'))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_path_name() {
        assert_eq!(resource_path_name("/users/{userId}"), "users");
        assert_eq!(resource_path_name("/users/{userId}/address"), "address");
        assert_eq!(resource_path_name("/{id}"), "");
    }

    #[test]
    fn test_template_params_reserved() {
        let mut declared = IndexMap::new();
        declared.insert("item".to_string(), Value::String("User".into()));
        let params = template_params(&declared, "/users", Some(HttpMethod::Get));
        assert_eq!(params["item"], Value::String("User".into()));
        assert_eq!(params[RESOURCE_PATH], Value::String("/users".into()));
        assert_eq!(params[RESOURCE_PATH_NAME], Value::String("users".into()));
        assert_eq!(params[METHOD_NAME], Value::String("get".into()));
    }
}
