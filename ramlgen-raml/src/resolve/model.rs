use indexmap::IndexMap;

use crate::{
    error::ReferenceKind,
    model::{DefinitionChoice, Declarations, HttpMethod, Method, Property, SecurityScheme},
    namespace::Namespace,
};

/// Index of a resource in [`ResolvedApi`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub(crate) usize);

impl ResourceId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A resource after resource types and traits have been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    pub id: ResourceId,
    /// URI relative to the parent, as declared (`/{userId}`)
    pub uri: String,
    /// URI from the API root (`/users/{userId}`)
    pub full_uri: String,
    pub parent: Option<ResourceId>,
    pub children: Vec<ResourceId>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// Name of the applied resource type
    pub resource_type: Option<String>,
    pub uri_parameters: IndexMap<String, Property>,
    pub methods: IndexMap<HttpMethod, Method>,
}

/// Text of the root document, kept for API documentation output.
#[derive(Debug, Clone, PartialEq)]
pub struct RootSource {
    pub file_name: String,
    pub content: String,
}

/// A security scheme found by name.
#[derive(Debug, Clone, Copy)]
pub struct SchemeRef<'a> {
    /// Declaration key, without library alias
    pub name: &'a str,
    /// Alias of the library declaring the scheme
    pub alias: Option<&'a str>,
    pub scheme: &'a SecurityScheme,
}

/// A fully resolved API.
///
/// Resources live in a flat arena in pre-order: a parent always comes
/// before its children, and siblings keep declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedApi {
    pub title: String,
    pub description: Option<String>,
    pub version: Option<String>,
    pub base_uri: Option<String>,
    pub media_type: Option<String>,
    pub protocols: Vec<String>,
    pub secured_by: Vec<DefinitionChoice>,
    pub declarations: Declarations,
    pub source: Option<RootSource>,
    nodes: Vec<ResourceNode>,
    roots: Vec<ResourceId>,
}

impl ResolvedApi {
    pub(crate) fn from_parts(
        api: crate::model::ApiDefinition,
        nodes: Vec<ResourceNode>,
        roots: Vec<ResourceId>,
    ) -> Self {
        Self {
            title: api.title,
            description: api.description,
            version: api.version,
            base_uri: api.base_uri,
            media_type: api.media_type,
            protocols: api.protocols,
            secured_by: api.secured_by,
            declarations: api.declarations,
            source: None,
            nodes,
            roots,
        }
    }

    /// Top-level resources in declaration order.
    pub fn roots(&self) -> &[ResourceId] {
        &self.roots
    }

    pub fn resource(&self, id: ResourceId) -> &ResourceNode {
        &self.nodes[id.0]
    }

    /// Every resource, parents before children.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The resource itself followed by its parents up to the root.
    pub fn ancestors(&self, id: ResourceId) -> Ancestors<'_> {
        Ancestors {
            api: self,
            next: Some(id),
        }
    }

    /// The top-level resource `id` belongs to.
    pub fn root_of(&self, id: ResourceId) -> ResourceId {
        self.ancestors(id).last().map(|node| node.id).unwrap_or(id)
    }

    /// `id` and all resources nested below it, in pre-order.
    pub fn subtree(&self, id: ResourceId) -> Vec<ResourceId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.resource(current).children.iter().rev().copied());
        }
        out
    }

    /// Name lookup rooted at this API's declarations.
    pub fn namespace(&self) -> Namespace<'_> {
        Namespace::new(&self.declarations)
    }

    /// Find a security scheme by (possibly qualified) name.
    ///
    /// Returns `None` when the scheme is not declared; callers that emit
    /// middleware skip such references.
    pub fn security_scheme(&self, name: &str) -> Option<SchemeRef<'_>> {
        let (owner, bare) = self
            .namespace()
            .resolve_qualified_name(name, &self.declarations, ReferenceKind::SecurityScheme, "securedBy")
            .ok()?;
        let (key, scheme) = owner.declarations()?.security_schemes.get_key_value(bare)?;
        Some(SchemeRef {
            name: key,
            alias: owner.alias(),
            scheme,
        })
    }
}

/// Iterator from a resource up to its root.
pub struct Ancestors<'a> {
    api: &'a ResolvedApi,
    next: Option<ResourceId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ResourceNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.api.resource(self.next?);
        self.next = node.parent;
        Some(node)
    }
}
