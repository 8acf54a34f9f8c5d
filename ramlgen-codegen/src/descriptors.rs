//! Language-neutral descriptions of what a backend renders per method.

use ramlgen_raml::{DefinitionChoice, HttpMethod, Method, ResourceId, SchemeKind};
use tracing::debug;

use crate::{
    EmitContext, Error, Result,
    paths::{NameStyle, comment_lines, method_name, paramize_with, resource_params, route_with},
};

/// A security scheme wrapped around a server handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Middleware {
    /// Reference as written in `securedBy` (`oauth2`, `common.oauth2`)
    pub reference: String,
    /// Declaration key of the scheme, without alias
    pub name: String,
    /// Library alias the scheme was found under
    pub alias: Option<String>,
    pub kind: SchemeKind,
    /// Scopes required by this method
    pub scopes: Vec<String>,
    /// Import path of the package defining the middleware, for library schemes
    pub import_path: Option<String>,
}

/// Middleware for every resolvable `securedBy` entry.
///
/// Unknown schemes are skipped. A `scopes` parameter that is not a list of
/// strings fails the run.
pub fn security_middlewares(
    ctx: &EmitContext<'_>,
    secured_by: &[DefinitionChoice],
    context: &str,
) -> Result<Vec<Middleware>> {
    let mut middlewares = Vec::new();
    for choice in secured_by {
        let Some(found) = ctx.api.security_scheme(&choice.name) else {
            debug!(scheme = %choice.name, context, "security scheme not declared, no middleware");
            continue;
        };
        let scopes = choice.string_list("scopes").ok_or_else(|| {
            Error::generation(
                format!("security of {context}"),
                format!("scopes of '{}' must be a list of strings", choice.name),
            )
        })?;
        let import_path = match found.alias {
            Some(_) => ctx.import_path_for(&choice.name, context)?,
            None => None,
        };
        middlewares.push(Middleware {
            reference: choice.name.clone(),
            name: found.name.to_string(),
            alias: found.alias.map(str::to_string),
            kind: found.scheme.scheme_kind(),
            scopes,
            import_path,
        });
    }
    Ok(middlewares)
}

/// A server handler for one verb on one resource.
#[derive(Debug, Clone)]
pub struct ServerMethod {
    pub resource: ResourceId,
    pub verb: HttpMethod,
    /// Handler name in the target style
    pub name: String,
    /// Route with parameters in the router's syntax
    pub route: String,
    /// URI parameters, root first
    pub params: Vec<String>,
    pub description: Vec<String>,
    /// Request body type as declared in RAML
    pub body_type: Option<String>,
    pub middlewares: Vec<Middleware>,
}

impl ServerMethod {
    /// Describe `verb` on `resource` with the given naming style. `route_param`
    /// renders one URI parameter in the router's syntax; it must name the
    /// parameter the way the handler's arguments do.
    pub fn build(
        ctx: &EmitContext<'_>,
        resource: ResourceId,
        verb: HttpMethod,
        method: &Method,
        style: NameStyle,
        route_param: impl Fn(&str) -> String,
    ) -> Result<Self> {
        let node = ctx.api.resource(resource);
        let context = format!("{} {}", verb.as_upper(), node.full_uri);
        Ok(Self {
            resource,
            verb,
            name: method_name(ctx.api, resource, verb, method.display_name.as_deref(), style),
            route: route_with(&node.full_uri, route_param),
            params: resource_params(ctx.api, resource),
            description: comment_lines(method.description.as_deref()),
            body_type: method.body.as_ref().and_then(|b| b.type_name.clone()),
            middlewares: security_middlewares(ctx, &method.secured_by, &context)?,
        })
    }
}

/// One argument of a generated client method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientArg {
    /// The client instance
    Receiver,
    /// Request body, for verbs that carry one
    Body,
    /// A URI parameter
    Path(String),
    /// Optional extra request headers
    Headers,
    /// Optional query parameters
    QueryParams,
}

/// Client method arguments: receiver, body for PUT/POST/PATCH, path
/// parameters in order, then optional headers and query parameters.
pub fn client_args(verb: HttpMethod, params: &[String]) -> Vec<ClientArg> {
    let mut args = vec![ClientArg::Receiver];
    if verb.has_body() {
        args.push(ClientArg::Body);
    }
    args.extend(params.iter().cloned().map(ClientArg::Path));
    args.push(ClientArg::Headers);
    args.push(ClientArg::QueryParams);
    args
}

/// A client call for one verb on one resource.
#[derive(Debug, Clone)]
pub struct ClientMethod {
    pub resource: ResourceId,
    pub verb: HttpMethod,
    pub name: String,
    /// URI template of the resource, e.g. `/users/{userId}`
    pub uri: String,
    /// URL expression relative to the base URI, e.g. `"/users/" + userId`
    pub url: String,
    pub args: Vec<ClientArg>,
    pub description: Vec<String>,
    /// Request body type as declared in RAML
    pub body_type: Option<String>,
    /// Type of the first 2xx response body with a declared type
    pub response_type: Option<String>,
    pub query_parameters: Vec<String>,
}

impl ClientMethod {
    /// Describe `verb` on `resource`. `var` maps URI parameter names to
    /// variable names in the target language.
    pub fn build(
        ctx: &EmitContext<'_>,
        resource: ResourceId,
        verb: HttpMethod,
        method: &Method,
        style: NameStyle,
        var: impl Fn(&str) -> String,
    ) -> Self {
        let node = ctx.api.resource(resource);
        let params = resource_params(ctx.api, resource);
        let response_type = method
            .responses
            .iter()
            .filter(|(code, _)| code.starts_with('2'))
            .find_map(|(_, response)| response.body.as_ref()?.type_name.clone());
        Self {
            resource,
            verb,
            name: method_name(ctx.api, resource, verb, method.display_name.as_deref(), style),
            uri: node.full_uri.clone(),
            url: paramize_with(&node.full_uri, &var),
            args: client_args(verb, &params),
            description: comment_lines(method.description.as_deref()),
            body_type: method.body.as_ref().and_then(|b| b.type_name.clone()),
            response_type,
            query_parameters: method.query_parameters.keys().cloned().collect(),
        }
    }

    /// Path parameter names, in argument order.
    pub fn path_params(&self) -> impl Iterator<Item = &str> {
        self.args.iter().filter_map(|arg| match arg {
            ClientArg::Path(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use ramlgen_raml::{MemorySources, ResolvedApi, Resolver};

    use super::*;
    use crate::GenerateOptions;

    const API: &str = r#"#%RAML 1.0
title: Secured
uses:
  sec: libs/security.raml
securitySchemes:
  oauth2:
    type: OAuth 2.0
    settings:
      scopes: [admin, user]
/users/{userId}:
  get:
    description: |
      Get a user.
    securedBy: [oauth2: { scopes: [admin] }, ghost]
    responses:
      404:
      200:
        body:
          application/json:
            type: User
  put:
    securedBy: [sec.token]
  patch:
    securedBy: [oauth2: { scopes: admin }]
"#;

    const SECURITY: &str = r#"#%RAML 1.0 Library
securitySchemes:
  token:
    type: Pass Through
"#;

    fn resolve() -> ResolvedApi {
        let sources = MemorySources::new()
            .with_file("api.raml", API)
            .with_file("libs/security.raml", SECURITY);
        Resolver::new(&sources).resolve_file("api.raml").unwrap()
    }

    #[test]
    fn test_unknown_scheme_is_skipped() {
        let api = resolve();
        let options = GenerateOptions::server();
        let ctx = EmitContext::new(&api, &options);
        let id = api.roots()[0];
        let method = &api.resource(id).methods[&HttpMethod::Get];

        let server =
            ServerMethod::build(&ctx, id, HttpMethod::Get, method, NameStyle::Pascal, |p| format!("{{{p}}}"))
                .unwrap();

        assert_eq!(server.middlewares.len(), 1);
        let oauth2 = &server.middlewares[0];
        assert_eq!(oauth2.name, "oauth2");
        assert_eq!(oauth2.kind, SchemeKind::OAuth2);
        assert_eq!(oauth2.scopes, ["admin"]);
        assert_eq!(oauth2.import_path, None);

        assert_eq!(server.name, "UsersByUserIdGet");
        assert_eq!(server.route, "/users/{userId}");
        assert_eq!(server.params, ["userId"]);
        assert_eq!(server.description, ["Get a user."]);
    }

    #[test]
    fn test_library_scheme_has_import_path() {
        let api = resolve();
        let options = GenerateOptions::server();
        let ctx = EmitContext::new(&api, &options);
        let id = api.roots()[0];
        let method = &api.resource(id).methods[&HttpMethod::Put];

        let middlewares = security_middlewares(&ctx, &method.secured_by, "PUT /users").unwrap();
        assert_eq!(middlewares.len(), 1);
        assert_eq!(middlewares[0].alias.as_deref(), Some("sec"));
        assert_eq!(middlewares[0].kind, SchemeKind::PassThrough);
        assert_eq!(
            middlewares[0].import_path.as_deref(),
            Some("examples.com/ramlcode/libs/security")
        );
    }

    #[test]
    fn test_malformed_scopes_fail() {
        let api = resolve();
        let options = GenerateOptions::server();
        let ctx = EmitContext::new(&api, &options);
        let id = api.roots()[0];
        let method = &api.resource(id).methods[&HttpMethod::Patch];

        let err = security_middlewares(&ctx, &method.secured_by, "PATCH /users").unwrap_err();
        assert!(matches!(err, Error::Generation { .. }));
    }

    #[test]
    fn test_client_method_arguments() {
        let api = resolve();
        let options = GenerateOptions::client();
        let ctx = EmitContext::new(&api, &options);
        let id = api.roots()[0];
        let node = api.resource(id);

        let get = ClientMethod::build(
            &ctx,
            id,
            HttpMethod::Get,
            &node.methods[&HttpMethod::Get],
            NameStyle::Snake,
            str::to_string,
        );
        assert_eq!(get.name, "users_byUserId_get");
        assert_eq!(get.url, r#""/users/" + userId"#);
        assert_eq!(get.response_type.as_deref(), Some("User"));
        assert_eq!(
            get.args,
            [
                ClientArg::Receiver,
                ClientArg::Path("userId".into()),
                ClientArg::Headers,
                ClientArg::QueryParams,
            ]
        );

        let put = ClientMethod::build(
            &ctx,
            id,
            HttpMethod::Put,
            &node.methods[&HttpMethod::Put],
            NameStyle::Snake,
            str::to_string,
        );
        assert_eq!(put.args[1], ClientArg::Body);
        assert_eq!(put.path_params().collect::<Vec<_>>(), ["userId"]);
    }
}
