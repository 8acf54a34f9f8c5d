use indexmap::IndexMap;
use serde::Deserialize;
use serde_yaml::Value;

use crate::de::{null_as_default, properties, scalar_to_string};

const DEFAULT_PROPERTY_TYPE: &str = "string";
const DEFAULT_OBJECT_TYPE: &str = "object";

/// A named property of a type, or a header / query / URI parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawProperty")]
pub struct Property {
    pub type_name: String,
    pub required: bool,
    pub description: Option<String>,
    pub enum_values: Vec<String>,
}

impl Default for Property {
    fn default() -> Self {
        Self {
            type_name: DEFAULT_PROPERTY_TYPE.to_string(),
            required: true,
            description: None,
            enum_values: Vec::new(),
        }
    }
}

impl Property {
    /// A required property of the given type.
    pub fn of_type(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Parsed form of the property's type expression.
    pub fn type_expr(&self) -> TypeExpr {
        TypeExpr::parse(&self.type_name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProperty {
    Short(String),
    Full(PropertyDecl),
    Empty,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertyDecl {
    #[serde(rename = "type")]
    type_name: Option<String>,
    items: Option<String>,
    required: Option<bool>,
    description: Option<String>,
    #[serde(rename = "enum", default, deserialize_with = "null_as_default")]
    enum_values: Vec<Value>,
}

impl From<RawProperty> for Property {
    fn from(raw: RawProperty) -> Self {
        match raw {
            RawProperty::Short(type_name) => Self::of_type(type_name),
            RawProperty::Empty => Self::default(),
            RawProperty::Full(decl) => {
                let type_name = match (decl.type_name, decl.items) {
                    (Some(t), Some(items)) if t == "array" => format!("{items}[]"),
                    (None, Some(items)) => format!("{items}[]"),
                    (Some(t), _) => t,
                    (None, None) => DEFAULT_PROPERTY_TYPE.to_string(),
                };
                Self {
                    type_name,
                    required: decl.required.unwrap_or(true),
                    description: decl.description,
                    enum_values: decl.enum_values.iter().filter_map(scalar_to_string).collect(),
                }
            }
        }
    }
}

/// A declared data type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawType")]
pub struct Type {
    /// The base type expression (`object`, `string`, `Pet[]`, `common.Pet`, `A | B`)
    pub base: String,
    pub description: Option<String>,
    pub properties: IndexMap<String, Property>,
    pub items: Option<String>,
    pub enum_values: Vec<String>,
}

impl Default for Type {
    fn default() -> Self {
        Self {
            base: DEFAULT_OBJECT_TYPE.to_string(),
            description: None,
            properties: IndexMap::new(),
            items: None,
            enum_values: Vec::new(),
        }
    }
}

impl Type {
    /// Parsed form of the base type, with `type: array` + `items` folded into `X[]`.
    pub fn type_expr(&self) -> TypeExpr {
        match (&self.items, self.base.as_str()) {
            (Some(items), "array") => TypeExpr::Array(Box::new(TypeExpr::parse(items))),
            _ => TypeExpr::parse(&self.base),
        }
    }

    /// Whether the type is a structure with fields.
    pub fn is_object(&self) -> bool {
        !self.properties.is_empty() || self.base == DEFAULT_OBJECT_TYPE
    }

    /// Whether the type is a string enumeration.
    pub fn is_enum(&self) -> bool {
        !self.enum_values.is_empty()
    }

    /// Every type name this declaration mentions (base, items and property types).
    pub fn references(&self) -> Vec<String> {
        let mut names = self.type_expr().names();
        for property in self.properties.values() {
            names.extend(property.type_expr().names());
        }
        names
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawType {
    Short(String),
    Full(TypeDecl),
    Empty,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeDecl {
    #[serde(rename = "type")]
    base: Option<String>,
    description: Option<String>,
    #[serde(default, deserialize_with = "properties")]
    properties: IndexMap<String, Property>,
    items: Option<String>,
    #[serde(rename = "enum", default, deserialize_with = "null_as_default")]
    enum_values: Vec<Value>,
}

impl From<RawType> for Type {
    fn from(raw: RawType) -> Self {
        match raw {
            RawType::Short(base) => Self {
                base,
                ..Self::default()
            },
            RawType::Empty => Self::default(),
            RawType::Full(decl) => {
                let base = match (decl.base, &decl.items) {
                    (Some(base), _) => base,
                    (None, Some(_)) => "array".to_string(),
                    (None, None) if decl.properties.is_empty() && !decl.enum_values.is_empty() => {
                        DEFAULT_PROPERTY_TYPE.to_string()
                    }
                    (None, None) => DEFAULT_OBJECT_TYPE.to_string(),
                };
                Self {
                    base,
                    description: decl.description,
                    properties: decl.properties,
                    items: decl.items,
                    enum_values: decl.enum_values.iter().filter_map(scalar_to_string).collect(),
                }
            }
        }
    }
}

/// A parsed type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A builtin, a local type or a qualified `alias.Name`
    Named(String),
    /// `X[]`
    Array(Box<TypeExpr>),
    /// `A | B`
    Union(Vec<TypeExpr>),
}

impl TypeExpr {
    pub fn parse(expr: &str) -> Self {
        let expr = expr.trim();
        if has_top_level_pipe(expr) {
            return TypeExpr::Union(split_top_level(expr).into_iter().map(Self::parse).collect());
        }
        if let Some(inner) = expr.strip_suffix("[]") {
            return TypeExpr::Array(Box::new(Self::parse(inner)));
        }
        if let Some(inner) = expr.strip_prefix('(').and_then(|e| e.strip_suffix(')')) {
            return Self::parse(inner);
        }
        TypeExpr::Named(expr.to_string())
    }

    /// All named types in the expression, in order of appearance.
    pub fn names(&self) -> Vec<String> {
        match self {
            TypeExpr::Named(name) => vec![name.clone()],
            TypeExpr::Array(inner) => inner.names(),
            TypeExpr::Union(members) => members.iter().flat_map(Self::names).collect(),
        }
    }
}

fn has_top_level_pipe(expr: &str) -> bool {
    split_top_level(expr).len() > 1
}

fn split_top_level(expr: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                parts.push(expr[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(expr[start..].trim());
    parts
}

/// Builtin RAML scalar types.
pub fn is_builtin(name: &str) -> bool {
    matches!(
        name,
        "string"
            | "number"
            | "integer"
            | "boolean"
            | "date-only"
            | "time-only"
            | "datetime-only"
            | "datetime"
            | "file"
            | "nil"
            | "any"
            | "object"
            | "array"
    )
}
