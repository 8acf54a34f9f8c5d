use std::{fs, path::Path};

use ramlgen_raml::{
    Error, HttpMethod, MemorySources, ReferenceKind, ResolvedApi, Resolver, resolve_file,
};
use tempfile::TempDir;

fn resolve(sources: &MemorySources) -> ramlgen_raml::Result<ResolvedApi> {
    Resolver::new(sources).resolve_file("api/api.raml")
}

const COLLECTIONS: &str = r#"#%RAML 1.0
title: Users
securedBy: [oauth2]
securitySchemes:
  oauth2:
    type: OAuth 2.0
    settings:
      scopes: [admin]
resourceTypes:
  collection:
    description: Collection of <<resourcePathName>>
    get:
      description: List <<item | !lowercase | !pluralize>>
      responses:
        200:
          body:
            application/json:
              type: <<item>>[]
    post?:
      description: Create a <<item | !lowercase>>
      body: <<item>>
  member:
    type: { collection: { item: <<item>> } }
    delete:
      description: Delete <<resourcePathName | !singularize>>
traits:
  paged:
    queryParameters:
      <<pageParam>>:
        type: integer
        required: false
  searchable:
    queryParameters:
      q: string
types:
  User:
    properties:
      name: string
/users:
  type: { collection: { item: User } }
  is: [searchable]
  post:
    description: Register
  get:
    is: [{ paged: { pageParam: page } }]
    securedBy: [null]
  /{userId}:
    type: { member: { item: User } }
    get:
      securedBy: [ghost]
"#;

#[test]
fn test_resource_tree_is_linked_in_preorder() {
    let sources = MemorySources::new().with_file("api/api.raml", COLLECTIONS);
    let api = resolve(&sources).unwrap();

    assert_eq!(api.len(), 2);
    let users = api.resource(api.roots()[0]);
    assert_eq!(users.full_uri, "/users");
    assert_eq!(users.parent, None);

    let member = api.resource(users.children[0]);
    assert_eq!(member.uri, "/{userId}");
    assert_eq!(member.full_uri, "/users/{userId}");
    assert_eq!(member.parent, Some(users.id));

    let chain: Vec<_> = api.ancestors(member.id).map(|n| n.full_uri.as_str()).collect();
    assert_eq!(chain, ["/users/{userId}", "/users"]);
    assert_eq!(api.root_of(member.id), users.id);
    assert_eq!(api.subtree(users.id), [users.id, member.id]);
    assert_eq!(api.source.as_ref().unwrap().file_name, "api.raml");
}

#[test]
fn test_resource_type_applied_with_explicit_precedence() {
    let sources = MemorySources::new().with_file("api/api.raml", COLLECTIONS);
    let api = resolve(&sources).unwrap();
    let users = api.resource(api.roots()[0]);

    assert_eq!(users.resource_type.as_deref(), Some("collection"));
    assert_eq!(users.description.as_deref(), Some("Collection of users"));

    let get = &users.methods[&HttpMethod::Get];
    assert_eq!(get.description.as_deref(), Some("List users"));
    let body = get.responses["200"].body.as_ref().unwrap();
    assert_eq!(body.type_name.as_deref(), Some("User[]"));

    // Explicit description wins, inherited body fills the gap
    let post = &users.methods[&HttpMethod::Post];
    assert_eq!(post.description.as_deref(), Some("Register"));
    assert_eq!(post.body.as_ref().unwrap().type_name.as_deref(), Some("User"));
}

#[test]
fn test_optional_method_needs_declaration() {
    let sources = MemorySources::new().with_file("api/api.raml", COLLECTIONS);
    let api = resolve(&sources).unwrap();
    let users = api.resource(api.roots()[0]);
    let member = api.resource(users.children[0]);

    // member inherits collection: get is mandatory, post? is optional
    assert!(member.methods.contains_key(&HttpMethod::Get));
    assert!(member.methods.contains_key(&HttpMethod::Delete));
    assert!(!member.methods.contains_key(&HttpMethod::Post));
    assert_eq!(
        member.methods[&HttpMethod::Delete].description.as_deref(),
        Some("Delete user")
    );
}

#[test]
fn test_traits_applied_and_recorded() {
    let sources = MemorySources::new().with_file("api/api.raml", COLLECTIONS);
    let api = resolve(&sources).unwrap();
    let users = api.resource(api.roots()[0]);

    let get = &users.methods[&HttpMethod::Get];
    assert_eq!(get.traits, ["searchable", "paged"]);
    assert!(!get.query_parameters["page"].required);
    assert_eq!(get.query_parameters["q"].type_name, "string");

    let post = &users.methods[&HttpMethod::Post];
    assert_eq!(post.traits, ["searchable"]);
}

#[test]
fn test_security_inheritance() {
    let sources = MemorySources::new().with_file("api/api.raml", COLLECTIONS);
    let api = resolve(&sources).unwrap();
    let users = api.resource(api.roots()[0]);
    let member = api.resource(users.children[0]);

    // `[null]` is anonymous access only, so the API default applies
    assert_eq!(users.methods[&HttpMethod::Get].secured_by[0].name, "oauth2");
    assert_eq!(users.methods[&HttpMethod::Post].secured_by[0].name, "oauth2");
    assert_eq!(member.methods[&HttpMethod::Get].secured_by[0].name, "ghost");

    assert!(api.security_scheme("oauth2").is_some());
    assert!(api.security_scheme("ghost").is_none());
}

#[test]
fn test_library_references_are_qualified() {
    let root = r#"#%RAML 1.0
title: Shop
uses:
  common: libs/common-lib.raml
/orders:
  type: common.collection
  get:
"#;
    let library = r#"#%RAML 1.0 Library
usage: Shared declarations
uses:
  ids: ids.raml
traits:
  paged:
    queryParameters:
      page: integer
securitySchemes:
  oauth2:
    type: OAuth 2.0
resourceTypes:
  collection:
    is: [paged]
    securedBy: [oauth2]
    get:
      body: ids.Id
"#;
    let ids = "#%RAML 1.0 Library\ntypes:\n  Id: string\n";
    let sources = MemorySources::new()
        .with_file("api/api.raml", root)
        .with_file("api/libs/common-lib.raml", library)
        .with_file("api/libs/ids.raml", ids);

    let api = resolve(&sources).unwrap();
    let orders = api.resource(api.roots()[0]);
    let get = &orders.methods[&HttpMethod::Get];

    assert_eq!(get.traits, ["common.paged"]);
    assert_eq!(get.query_parameters["page"].type_name, "integer");
    assert_eq!(get.secured_by[0].name, "common.oauth2");

    let scheme = api.security_scheme("common.oauth2").unwrap();
    assert_eq!(scheme.alias, Some("common"));
    assert_eq!(scheme.name, "oauth2");

    let common = &api.declarations.libraries["common"];
    assert_eq!(common.path, "libs/common-lib.raml");
    assert_eq!(common.declarations.traits["paged"].name(), "paged");
    assert!(common.declarations.libraries["ids"].declarations.types.contains_key("Id"));
}

fn expect_reference(result: ramlgen_raml::Result<ResolvedApi>, kind: ReferenceKind, name: &str) {
    match result.map(|_| ()).map_err(|e| *e) {
        Err(Error::Reference {
            kind: actual,
            name: actual_name,
            ..
        }) => {
            assert_eq!(actual, kind);
            assert_eq!(actual_name, name);
        }
        other => panic!("expected {kind} reference error for {name}, got {other:?}"),
    }
}

#[test]
fn test_unknown_trait_is_reference_error() {
    let doc = "title: T\n/a:\n  get:\n    is: [missing]\n";
    let sources = MemorySources::new().with_file("api/api.raml", doc);
    expect_reference(resolve(&sources), ReferenceKind::Trait, "missing");
}

#[test]
fn test_unknown_resource_type_is_reference_error() {
    let doc = "title: T\n/a:\n  type: nothing\n";
    let sources = MemorySources::new().with_file("api/api.raml", doc);
    expect_reference(resolve(&sources), ReferenceKind::ResourceType, "nothing");
}

#[test]
fn test_resource_type_cycle_is_reference_error() {
    let doc = r#"title: T
resourceTypes:
  a:
    type: b
  b:
    type: a
/x:
  type: a
"#;
    let sources = MemorySources::new().with_file("api/api.raml", doc);
    expect_reference(resolve(&sources), ReferenceKind::ResourceType, "a");
}

#[test]
fn test_unknown_security_alias_is_reference_error() {
    let doc = "title: T\n/a:\n  get:\n    securedBy: [nolib.oauth2]\n";
    let sources = MemorySources::new().with_file("api/api.raml", doc);
    expect_reference(resolve(&sources), ReferenceKind::Library, "nolib");
}

#[test]
fn test_unknown_type_alias_is_reference_error() {
    let doc = "title: T\ntypes:\n  Pet:\n    properties:\n      owner: people.Person\n";
    let sources = MemorySources::new().with_file("api/api.raml", doc);
    expect_reference(resolve(&sources), ReferenceKind::Library, "people");
}

#[test]
fn test_missing_template_parameter() {
    let doc = r#"title: T
resourceTypes:
  collection:
    get:
      body: <<item>>
/a:
  type: collection
"#;
    let sources = MemorySources::new().with_file("api/api.raml", doc);
    expect_reference(resolve(&sources), ReferenceKind::TemplateParameter, "item");
}

#[test]
fn test_malformed_document_is_parse_error() {
    let sources = MemorySources::new().with_file("api/api.raml", "title: [oops\n");
    let err = resolve(&sources).unwrap_err();
    assert!(matches!(*err, Error::Parse { .. }));
}

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_library_cycle_on_disk() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "api.raml", "title: Cyclic\nuses:\n  a: a.raml\n");
    write(temp.path(), "a.raml", "uses:\n  b: b.raml\n");
    write(temp.path(), "b.raml", "uses:\n  a: a.raml\n");

    let err = resolve_file(temp.path().join("api.raml")).unwrap_err();
    match *err {
        Error::LibraryCycle { ref chain } => {
            assert_eq!(chain.len(), 3);
            assert!(chain[0].ends_with("a.raml"));
            assert!(chain[1].ends_with("b.raml"));
            assert!(chain[2].ends_with("a.raml"));
        }
        ref other => panic!("expected library cycle, got {other:?}"),
    }
}

#[test]
fn test_resolve_from_disk_with_library() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "api.raml",
        "#%RAML 1.0\ntitle: Disk\nuses:\n  types: libs/types.raml\n/pets:\n  get:\n    body: types.Pet\n",
    );
    write(
        temp.path(),
        "libs/types.raml",
        "#%RAML 1.0 Library\ntypes:\n  Pet:\n    properties:\n      name: string\n",
    );

    let api = resolve_file(temp.path().join("api.raml")).unwrap();
    assert_eq!(api.title, "Disk");
    assert!(api.declarations.libraries["types"].declarations.types.contains_key("Pet"));
}

#[test]
fn test_missing_library_on_disk_is_reference_error() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "api.raml", "title: Broken\nuses:\n  gone: libs/gone.raml\n");

    expect_reference(
        resolve_file(temp.path().join("api.raml")),
        ReferenceKind::Library,
        "gone",
    );
}

#[test]
fn test_missing_root_document_is_io_error() {
    let err = resolve(&MemorySources::new()).unwrap_err();
    assert!(matches!(*err, Error::Io { .. }));
}
