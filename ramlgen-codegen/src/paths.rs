//! URI parameters, route expressions and method names derived from resource paths.

use ramlgen_core::{lower_first, to_pascal_case, upper_first};
use ramlgen_raml::{HttpMethod, ResolvedApi, ResourceId};

/// How derived method names are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    /// `users_byUserId_get`
    Snake,
    /// `UsersByUserIdGet`
    Pascal,
}

/// `{name}` placeholders of a URI, in order.
pub fn uri_params(uri: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut rest = uri;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        let name = &rest[open + 1..open + close];
        if !name.is_empty() {
            params.push(name.to_string());
        }
        rest = &rest[open + close + 1..];
    }
    params
}

/// URI parameters of a resource and all its parents, root first.
pub fn resource_params(api: &ResolvedApi, id: ResourceId) -> Vec<String> {
    let mut nodes: Vec<_> = api.ancestors(id).collect();
    nodes.reverse();
    nodes.into_iter().flat_map(|node| uri_params(&node.uri)).collect()
}

/// Turn a URI into a string concatenation expression.
///
/// `/users/{userId}` becomes `"/users/" + userId`. Literal parts are double
/// quoted; no empty literal is emitted before or after a parameter.
pub fn paramize(uri: &str) -> String {
    paramize_with(uri, |name| name.to_string())
}

/// Like [`paramize`], with a mapping from parameter name to variable name.
pub fn paramize_with(uri: &str, var: impl Fn(&str) -> String) -> String {
    let mut parts = Vec::new();
    let mut rest = uri;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        if open > 0 {
            parts.push(format!("\"{}\"", &rest[..open]));
        }
        parts.push(var(&rest[open + 1..open + close]));
        rest = &rest[open + close + 1..];
    }
    if !rest.is_empty() || parts.is_empty() {
        parts.push(format!("\"{rest}\""));
    }
    parts.join(" + ")
}

/// Rewrite each `{name}` placeholder with `param(name)`, leaving literal
/// segments untouched.
///
/// `route_with("/users/{id}", |p| format!("<{p}>"))` is `/users/<id>`.
pub fn route_with(uri: &str, param: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(uri.len());
    let mut rest = uri;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push_str(&param(&rest[open + 1..open + close]));
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

/// Name of the handler or client method for `verb` on a resource.
///
/// A declared display name is used with its whitespace removed. Otherwise the
/// name is built from the path segments of every resource from the root down:
/// literal segments as-is, `{x}` as `byX`, followed by the verb.
pub fn method_name(
    api: &ResolvedApi,
    id: ResourceId,
    verb: HttpMethod,
    display_name: Option<&str>,
    style: NameStyle,
) -> String {
    if let Some(name) = display_name.filter(|name| !name.trim().is_empty()) {
        let name: String = name.split_whitespace().collect();
        return match style {
            NameStyle::Snake => name,
            NameStyle::Pascal => upper_first(&name),
        };
    }

    let mut nodes: Vec<_> = api.ancestors(id).collect();
    nodes.reverse();
    let mut fragments: Vec<String> = nodes
        .iter()
        .flat_map(|node| node.uri.split('/'))
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment_fragment(segment, style))
        .collect();

    match style {
        NameStyle::Snake => {
            fragments.push(verb.as_str().to_string());
            fragments.join("_")
        }
        NameStyle::Pascal => {
            fragments.push(upper_first(verb.as_str()));
            fragments.concat()
        }
    }
}

fn segment_fragment(segment: &str, style: NameStyle) -> String {
    let fragment = match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        Some(param) => format!("by{}", upper_first(&identifier_chars(param))),
        None => lower_first(&identifier_chars(segment)),
    };
    match style {
        NameStyle::Snake => fragment,
        NameStyle::Pascal => upper_first(&fragment),
    }
}

/// Replace characters that cannot appear in identifiers (`-`, `.`, `{`).
fn identifier_chars(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '{' | '}'))
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Lines of a description for use as comments, trimmed, without blank
/// lines at either end.
pub fn comment_lines(description: Option<&str>) -> Vec<String> {
    let Some(description) = description else {
        return Vec::new();
    };
    let lines: Vec<&str> = description.lines().map(str::trim).collect();
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    lines[start..end].iter().map(|l| l.to_string()).collect()
}

/// Type name prefix of a root resource (`/users/{id}` -> `UsersById`).
pub fn resource_type_name(uri: &str) -> String {
    let name: String = uri
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(param) => format!("By{}", to_pascal_case(&words(param))),
                None => to_pascal_case(&words(segment)),
            }
        })
        .collect();
    if name.is_empty() { "Root".to_string() } else { name }
}

/// Replace characters that cannot appear in an identifier with word breaks.
fn words(segment: &str) -> String {
    segment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
