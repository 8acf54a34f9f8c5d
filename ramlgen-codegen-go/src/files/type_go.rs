//! One Go file per declared RAML type.

use std::path::{Path, PathBuf};

use ramlgen_codegen::{
    CodeBuilder, EmitContext, Error, Result, TypeMapper,
    generation::ImportCollector,
    language::is_identifier,
    paths::comment_lines,
};
use ramlgen_core::{FileRules, GeneratedFile};
use ramlgen_raml::{Type, TypeExpr, is_builtin};

use super::GENERATED_HEADER;
use crate::{
    naming::GO_NAMING,
    type_mapper::{GoTypeMapper, collect_imports, render_imports},
};

/// A struct field.
#[derive(Debug, Clone)]
pub struct FieldGo {
    pub name: String,
    pub ty: String,
    pub json: String,
    pub required: bool,
    pub description: Vec<String>,
}

/// Shape of the generated declaration.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// `type X struct { ... }`, optionally embedding a parent type
    Struct {
        embeds: Option<String>,
        fields: Vec<FieldGo>,
    },
    /// `type X string` with one constant per value
    Enum { base: String, values: Vec<String> },
    /// `type X <other>`
    Alias(String),
}

/// A RAML type rendered as Go.
#[derive(Debug, Clone)]
pub struct TypeGo {
    pub package: String,
    pub type_name: String,
    pub description: Vec<String>,
    pub imports: ImportCollector,
    pub kind: TypeKind,
}

impl TypeGo {
    pub fn build(ctx: &EmitContext<'_>, package: &str, name: &str, ty: &Type) -> Result<Self> {
        let mapper = GoTypeMapper;
        let type_name = GO_NAMING.checked_type_name(name)?;
        let context = format!("type '{name}'");
        let mut imports = ImportCollector::new();

        let kind = if ty.is_enum() {
            TypeKind::Enum {
                base: mapper.map_name(&ty.base),
                values: ty.enum_values.clone(),
            }
        } else if !ty.properties.is_empty() || ty.base == "object" {
            let embeds = match TypeExpr::parse(&ty.base) {
                TypeExpr::Named(base) if !is_builtin(&base) => {
                    collect_imports(ctx, &TypeExpr::Named(base.clone()), &context, &mut imports)?;
                    Some(mapper.map_name(&base))
                }
                _ => None,
            };
            let mut fields = Vec::new();
            for (property, declared) in &ty.properties {
                let field = GO_NAMING.field_name(property);
                if !is_identifier(&field) {
                    return Err(Error::generation(
                        format!("property '{property}' of {context}"),
                        format!("'{field}' is not a valid Go identifier"),
                    ));
                }
                let expr = declared.type_expr();
                collect_imports(ctx, &expr, &context, &mut imports)?;
                fields.push(FieldGo {
                    name: field,
                    ty: mapper.map(&expr),
                    json: property.clone(),
                    required: declared.required,
                    description: comment_lines(declared.description.as_deref()),
                });
            }
            TypeKind::Struct { embeds, fields }
        } else {
            let expr = ty.type_expr();
            collect_imports(ctx, &expr, &context, &mut imports)?;
            TypeKind::Alias(mapper.map(&expr))
        };

        Ok(Self {
            package: package.to_string(),
            type_name,
            description: comment_lines(ty.description.as_deref()),
            imports,
            kind,
        })
    }

    fn render_kind(&self, builder: CodeBuilder) -> CodeBuilder {
        let name = &self.type_name;
        match &self.kind {
            TypeKind::Struct { embeds, fields } => {
                builder.block_with_close(&format!("type {name} struct {{"), "}", |b| {
                    let b = b.when(embeds.is_some(), |b| {
                        b.line(embeds.as_deref().unwrap_or_default())
                    });
                    fields.iter().fold(b, |b, field| {
                        let tag = if field.required {
                            format!("`json:\"{}\"`", field.json)
                        } else {
                            format!("`json:\"{},omitempty\"`", field.json)
                        };
                        b.comment("//", &field.description)
                            .line(&format!("{} {} {tag}", field.name, field.ty))
                    })
                })
            }
            TypeKind::Enum { base, values } => builder
                .line(&format!("type {name} {base}"))
                .blank()
                .block_with_close("const (", ")", |b| {
                    values.iter().fold(b, |b, value| {
                        let constant = format!("{name}{}", GO_NAMING.type_name(&enum_suffix(value)));
                        b.line(&format!("{constant} {name} = \"{value}\""))
                    })
                }),
            TypeKind::Alias(target) => builder.line(&format!("type {name} {target}")),
        }
    }
}

/// Identifier-safe form of an enum value.
fn enum_suffix(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

impl GeneratedFile for TypeGo {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(format!("{}.go", self.type_name))
    }

    fn rules(&self) -> FileRules {
        FileRules::generated(GENERATED_HEADER)
    }

    fn render(&self) -> String {
        let builder = CodeBuilder::go()
            .line(&format!("package {}", self.package))
            .blank();
        let builder = render_imports(builder, &self.imports).comment("//", &self.description);
        self.render_kind(builder).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_with_description() {
        let ty = TypeGo {
            package: "main".into(),
            type_name: "Ids".into(),
            description: vec!["Identifiers of one page.".into()],
            imports: ImportCollector::new(),
            kind: TypeKind::Alias("[]string".into()),
        };

        insta::assert_snapshot!(ty.render(), @r"
        package main

        // Identifiers of one page.
        type Ids []string
        ");
        assert_eq!(ty.path(Path::new("libs/ids")), PathBuf::from("libs/ids/Ids.go"));
    }

    #[test]
    fn test_enum_suffix() {
        assert_eq!(enum_suffix("in-stock"), "in_stock");
        assert_eq!(GO_NAMING.type_name(&enum_suffix("in-stock")), "InStock");
    }
}
