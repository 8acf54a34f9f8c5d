//! End-to-end tests of the Go backend on a small pet store API.

use ramlgen_codegen::{Error, GenerateOptions};
use ramlgen_codegen_go::{Generator, LanguageCodegen};
use ramlgen_raml::{MemorySources, ResolvedApi, Resolver};
use tempfile::TempDir;

const API: &str = r#"#%RAML 1.0
title: Pets
baseUri: https://api.example.com/v1
uses:
  common: libs/common-types.raml
types:
  Pet:
    properties:
      name: string
      born?: datetime
      owner: common.Owner
  Kind:
    enum: [dog, cat]
securitySchemes:
  oauth2:
    type: OAuth 2.0
/pets:
  get:
    description: List pets.
    securedBy: [oauth2: { scopes: [admin] }, ghost]
  post:
    body:
      application/json:
        type: Pet
  /{petId}:
    delete:
      securedBy: [common.apiKey]
"#;

const COMMON: &str = r#"#%RAML 1.0 Library
types:
  Owner:
    properties:
      name: string
securitySchemes:
  apiKey:
    type: Pass Through
    describedBy:
      headers:
        X-Api-Key: string
"#;

fn resolve(root: &str) -> ResolvedApi {
    let sources = MemorySources::new()
        .with_file("api.raml", root)
        .with_file("libs/common-types.raml", COMMON);
    Resolver::new(&sources).resolve_file("api.raml").unwrap()
}

/// Plan the output and return it as (path, content) pairs.
fn generate_files(api: &ResolvedApi, options: &GenerateOptions) -> Vec<(String, String)> {
    Generator::new(api, options)
        .preview()
        .unwrap()
        .into_iter()
        .map(|f| (f.path, f.content))
        .collect()
}

fn get_file<'a>(files: &'a [(String, String)], path: &str) -> Option<&'a str> {
    files
        .iter()
        .find(|(p, _)| p == path)
        .map(|(_, c)| c.as_str())
}

#[test]
fn test_struct_type_with_library_and_support_imports() {
    let api = resolve(API);
    let files = generate_files(&api, &GenerateOptions::server());

    let pet = get_file(&files, "Pet.go").expect("Pet.go not found");
    assert_eq!(
        pet,
        "// Code generated by ramlgen. DO NOT EDIT.\n\
         \n\
         package main\n\
         \n\
         import (\n\
         \tgoraml \"examples.com/ramlcode/goraml\"\n\
         \tcommon \"examples.com/ramlcode/libs/common_types\"\n\
         )\n\
         \n\
         type Pet struct {\n\
         \tName string `json:\"name\"`\n\
         \tBorn goraml.DateTime `json:\"born,omitempty\"`\n\
         \tOwner common.Owner `json:\"owner\"`\n\
         }\n"
    );
}

#[test]
fn test_enum_type() {
    let api = resolve(API);
    let files = generate_files(&api, &GenerateOptions::server());

    let kind = get_file(&files, "Kind.go").expect("Kind.go not found");
    assert!(kind.contains("type Kind string\n"));
    assert!(kind.contains("\tKindDog Kind = \"dog\"\n\tKindCat Kind = \"cat\"\n"));
}

#[test]
fn test_library_package_files() {
    let api = resolve(API);
    let files = generate_files(&api, &GenerateOptions::server());

    let owner = get_file(&files, "libs/common_types/Owner.go").expect("Owner.go not found");
    assert!(owner.contains("package common_types\n"));

    let middleware = get_file(&files, "libs/common_types/api_key_middleware.go")
        .expect("library middleware not found");
    assert!(middleware.starts_with("package common_types\n"));
    assert!(middleware.contains("if r.Header.Get(\"X-Api-Key\") == \"\" {"));
}

#[test]
fn test_interface_routes_wrap_middleware() {
    let api = resolve(API);
    let files = generate_files(&api, &GenerateOptions::server());

    let interface = get_file(&files, "pets_if.go").expect("pets_if.go not found");
    assert!(interface.starts_with("// Code generated by ramlgen. DO NOT EDIT.\n"));
    assert!(interface.contains(
        "import (\n\t\"net/http\"\n\t\"github.com/gorilla/mux\"\n\tcommon \"examples.com/ramlcode/libs/common_types\"\n)\n"
    ));
    assert!(interface.contains("\t// PetsGet is the handler for GET /pets\n\t// List pets.\n"));
    assert!(interface.contains(
        "\tr.Handle(\"/pets\", NewOauth2Middleware([]string{\"admin\"}).Handler(http.HandlerFunc(i.PetsGet))).Methods(\"GET\")\n"
    ));
    assert!(interface.contains("\tr.HandleFunc(\"/pets\", i.PetsPost).Methods(\"POST\")\n"));
    assert!(interface.contains(
        "\tr.Handle(\"/pets/{petId}\", common.NewApiKeyMiddleware([]string{}).Handler(http.HandlerFunc(i.PetsByPetIdDelete))).Methods(\"DELETE\")\n"
    ));
    // the undeclared scheme gets no middleware
    assert!(!interface.contains("Ghost"));
}

#[test]
fn test_api_stub_decodes_body() {
    let api = resolve(API);
    let files = generate_files(&api, &GenerateOptions::server());

    let stub = get_file(&files, "pets_api.go").expect("pets_api.go not found");
    assert!(!stub.contains("DO NOT EDIT"));
    assert!(stub.contains("\t\"encoding/json\"\n"));
    assert!(stub.contains("func (api PetsAPI) PetsPost(w http.ResponseWriter, r *http.Request) {\n\tvar reqBody Pet\n"));
}

#[test]
fn test_main_and_apidocs() {
    let api = resolve(API);
    let files = generate_files(&api, &GenerateOptions::server());

    let main = get_file(&files, "main.go").expect("main.go not found");
    assert!(main.contains("\tPetsInterfaceRoutes(r, PetsAPI{})\n"));
    assert!(main.contains("apidocs"));
    assert_eq!(get_file(&files, "apidocs/api.raml"), Some(API));
    assert!(get_file(&files, "apidocs/index.html").is_some());
    assert!(get_file(&files, "goraml/datetime.go").is_some());
    assert!(get_file(&files, "oauth2_middleware.go").is_some());
}

#[test]
fn test_no_main_no_apidocs() {
    let api = resolve(API);
    let options = GenerateOptions {
        with_main: false,
        with_apidocs: false,
        ..GenerateOptions::server()
    };
    let files = generate_files(&api, &options);

    assert!(get_file(&files, "main.go").is_none());
    assert!(!files.iter().any(|(path, _)| path.starts_with("apidocs/")));
    assert!(get_file(&files, "pets_if.go").is_some());
}

#[test]
fn test_client() {
    let api = resolve(API);
    let files = generate_files(&api, &GenerateOptions::client());

    assert!(get_file(&files, "pets_if.go").is_none());
    assert!(get_file(&files, "oauth2_middleware.go").is_none());

    let client = get_file(&files, "client_client.go").expect("client file not found");
    assert!(client.contains("package client\n"));
    assert!(client.contains("defaultBaseURI = \"https://api.example.com/v1\""));
    assert!(client.contains(
        "func (c *Client) PetsPost(body Pet, headers, queryParams map[string]interface{}) (*http.Response, error) {"
    ));
    assert!(client.contains(
        "func (c *Client) PetsByPetIdDelete(petId string, headers, queryParams map[string]interface{}) (*http.Response, error) {\n\treturn c.do(\"DELETE\", \"/pets/\" + petId, nil, headers, queryParams)\n}"
    ));
}

#[test]
fn test_invalid_type_name_fails() {
    let api = resolve("#%RAML 1.0\ntitle: Bad\ntypes:\n  2fast: string\n");
    let err = Generator::new(&api, &GenerateOptions::server())
        .preview()
        .unwrap_err();

    assert!(matches!(err, Error::Generation { .. }));
    assert!(err.to_string().contains("2fast"));
}

#[test]
fn test_generate_keeps_user_files() {
    let api = resolve(API);
    let options = GenerateOptions::server();
    let temp = TempDir::new().unwrap();
    let generator = Generator::new(&api, &options);

    let first = generator.generate(temp.path()).unwrap();
    assert!(first.skipped.is_empty());
    assert!(temp.path().join("libs/common_types/Owner.go").is_file());

    std::fs::write(temp.path().join("pets_api.go"), "package main // mine\n").unwrap();
    let second = generator.generate(temp.path()).unwrap();

    assert!(second.skipped.contains(&"pets_api.go".to_string()));
    assert!(second.written.contains(&"pets_if.go".to_string()));
    assert_eq!(
        std::fs::read_to_string(temp.path().join("pets_api.go")).unwrap(),
        "package main // mine\n"
    );
}
