//! The `api_types.py` module of a package: dataclasses, enums and aliases.

use std::path::{Path, PathBuf};

use ramlgen_codegen::{
    CodeBuilder, EmitContext, Error, Result, TypeMapper,
    generation::ImportCollector,
    language::is_identifier,
    paths::comment_lines,
};
use ramlgen_core::{FileRules, GeneratedFile};
use ramlgen_raml::{Declarations, TypeExpr, is_builtin};

use super::{GENERATED_HEADER, TYPES_MODULE, render_imports};
use crate::{
    naming::{PY_NAMING, enum_member},
    type_mapper::{PythonTypeMapper, collect_imports},
};

/// A dataclass field.
#[derive(Debug, Clone)]
pub struct FieldPy {
    pub name: String,
    pub ty: String,
    pub required: bool,
}

/// A RAML object type.
#[derive(Debug, Clone)]
pub struct ClassPy {
    pub name: String,
    /// Parent class declared in the same module or a library
    pub base: Option<String>,
    pub description: Vec<String>,
    pub fields: Vec<FieldPy>,
}

/// A RAML enumeration.
#[derive(Debug, Clone)]
pub struct EnumPy {
    pub name: String,
    pub description: Vec<String>,
    pub values: Vec<String>,
}

/// All types of one package.
#[derive(Debug, Clone, Default)]
pub struct TypesPy {
    pub imports: ImportCollector,
    pub enums: Vec<EnumPy>,
    pub classes: Vec<ClassPy>,
    /// `(name, target)` pairs, emitted after every class
    pub aliases: Vec<(String, String)>,
}

impl TypesPy {
    pub fn build(ctx: &EmitContext<'_>, declarations: &Declarations) -> Result<Self> {
        let mapper = PythonTypeMapper;
        let mut types = Self::default();

        for (name, ty) in &declarations.types {
            let type_name = PY_NAMING.checked_type_name(name)?;
            let context = format!("type '{name}'");
            let description = comment_lines(ty.description.as_deref());

            if ty.is_enum() {
                types.enums.push(EnumPy {
                    name: type_name,
                    description,
                    values: ty.enum_values.clone(),
                });
            } else if ty.is_object() {
                let base = match TypeExpr::parse(&ty.base) {
                    TypeExpr::Named(base) if !is_builtin(&base) => {
                        let expr = TypeExpr::Named(base);
                        collect_imports(ctx, &expr, &context, &mut types.imports)?;
                        Some(mapper.map(&expr))
                    }
                    _ => None,
                };
                let mut fields = Vec::new();
                for (property, declared) in &ty.properties {
                    let field = PY_NAMING.field_name(property);
                    if !is_identifier(&field) {
                        return Err(Error::generation(
                            format!("property '{property}' of {context}"),
                            format!("'{field}' is not a valid Python identifier"),
                        ));
                    }
                    let expr = declared.type_expr();
                    collect_imports(ctx, &expr, &context, &mut types.imports)?;
                    fields.push(FieldPy {
                        name: field,
                        ty: mapper.map(&expr),
                        required: declared.required,
                    });
                }
                types.classes.push(ClassPy {
                    name: type_name,
                    base,
                    description,
                    fields,
                });
            } else {
                let expr = ty.type_expr();
                collect_imports(ctx, &expr, &context, &mut types.imports)?;
                types.aliases.push((type_name, mapper.map(&expr)));
            }
        }

        types.order_classes();
        Ok(types)
    }

    /// Move each class after the local class it extends.
    fn order_classes(&mut self) {
        let mut pending = std::mem::take(&mut self.classes);
        while !pending.is_empty() {
            let ready = pending.iter().position(|class| match &class.base {
                Some(base) => !pending.iter().any(|other| &other.name == base),
                None => true,
            });
            // a cycle keeps declaration order
            let index = ready.unwrap_or(0);
            self.classes.push(pending.remove(index));
        }
    }

    fn render_enum(builder: CodeBuilder, item: &EnumPy) -> CodeBuilder {
        builder
            .blank()
            .blank()
            .block(&format!("class {}(Enum):", item.name), |b| {
                let b = b.when(!item.description.is_empty(), |b| b.docstring(&item.description));
                item.values.iter().fold(b, |b, value| {
                    b.line(&format!("{} = \"{value}\"", enum_member(value)))
                })
            })
    }

    fn render_class(builder: CodeBuilder, class: &ClassPy) -> CodeBuilder {
        let header = match &class.base {
            Some(base) => format!("class {}({base}):", class.name),
            None => format!("class {}:", class.name),
        };
        // fields without a default must come first
        let (required, optional): (Vec<&FieldPy>, Vec<&FieldPy>) =
            class.fields.iter().partition(|f| f.required);
        builder
            .blank()
            .blank()
            .line("@dataclass")
            .block(&header, |b| {
                let b = b.when(!class.description.is_empty(), |b| {
                    b.docstring(&class.description).blank()
                });
                let b = required
                    .iter()
                    .fold(b, |b, f| b.line(&format!("{}: {}", f.name, f.ty)));
                let b = optional.iter().fold(b, |b, f| {
                    b.line(&format!("{}: Optional[{}] = None", f.name, f.ty))
                });
                b.when(class.fields.is_empty() && class.description.is_empty(), |b| {
                    b.line("pass")
                })
            })
    }
}

impl GeneratedFile for TypesPy {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(format!("{TYPES_MODULE}.py"))
    }

    fn rules(&self) -> FileRules {
        FileRules::generated(GENERATED_HEADER)
    }

    fn render(&self) -> String {
        let builder = CodeBuilder::python()
            .line("from __future__ import annotations")
            .blank()
            .line("from dataclasses import dataclass")
            .line("from datetime import date, datetime, time")
            .line("from enum import Enum")
            .line("from typing import Any, Dict, List, Optional, Union");
        let builder = if self.imports.is_empty() {
            builder
        } else {
            render_imports(builder.blank(), &self.imports)
        };
        let builder = self.enums.iter().fold(builder, Self::render_enum);
        let builder = self.classes.iter().fold(builder, Self::render_class);
        let builder = builder.when(!self.aliases.is_empty(), |b| b.blank().blank());
        self.aliases
            .iter()
            .fold(builder, |b, (name, target)| b.line(&format!("{name} = {target}")))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataclass_fields_required_first() {
        let types = TypesPy {
            classes: vec![ClassPy {
                name: "Pet".into(),
                base: None,
                description: vec!["A pet.".into()],
                fields: vec![
                    FieldPy {
                        name: "born".into(),
                        ty: "datetime".into(),
                        required: false,
                    },
                    FieldPy {
                        name: "name".into(),
                        ty: "str".into(),
                        required: true,
                    },
                ],
            }],
            ..TypesPy::default()
        };

        let code = types.render();
        assert!(code.contains(
            "@dataclass\nclass Pet:\n    \"\"\"\n    A pet.\n    \"\"\"\n\n    name: str\n    born: Optional[datetime] = None\n"
        ));
    }

    #[test]
    fn test_subclass_follows_parent() {
        let class = |name: &str, base: Option<&str>| ClassPy {
            name: name.into(),
            base: base.map(str::to_string),
            description: Vec::new(),
            fields: Vec::new(),
        };
        let mut types = TypesPy {
            classes: vec![class("Cat", Some("Pet")), class("Pet", None), class("Dog", Some("common.Pet"))],
            ..TypesPy::default()
        };

        types.order_classes();

        let names: Vec<_> = types.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Pet", "Cat", "Dog"]);
    }

    #[test]
    fn test_enum_and_alias_rendering() {
        let types = TypesPy {
            enums: vec![EnumPy {
                name: "Kind".into(),
                description: Vec::new(),
                values: vec!["dog".into(), "in-stock".into()],
            }],
            aliases: vec![("Ids".into(), "List[str]".into())],
            ..TypesPy::default()
        };

        insta::assert_snapshot!(types.render(), @r#"
        from __future__ import annotations

        from dataclasses import dataclass
        from datetime import date, datetime, time
        from enum import Enum
        from typing import Any, Dict, List, Optional, Union


        class Kind(Enum):
            DOG = "dog"
            IN_STOCK = "in-stock"


        Ids = List[str]
        "#);
    }
}
